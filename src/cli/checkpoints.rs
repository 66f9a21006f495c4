//! Checkpoints command implementation.

use super::output::format_checkpoints_text;
use super::{load_config, open, CliError, ReportFormat};
use std::path::PathBuf;

/// Execute the checkpoints command.
///
/// # Errors
///
/// Returns an error if the config or replay cannot be loaded, or the
/// checkpoint list is not ascending.
pub(crate) fn execute(
    config: Option<PathBuf>,
    replay: PathBuf,
    at: Option<Vec<u32>>,
    format: ReportFormat,
) -> Result<(), CliError> {
    let mut config = load_config(config.as_deref())?;
    if let Some(checkpoints) = at {
        config.checkpoints = checkpoints;
    }

    let (reconstructor, replay) = open(config, &replay)?;
    let run = reconstructor.checkpoints(&replay)?;

    match format {
        ReportFormat::Text => print!("{}", format_checkpoints_text(&run.checkpoints)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&run.checkpoints)?),
    }

    Ok(())
}
