//! Summary command implementation.

use super::output::format_summary_text;
use super::{load_config, open, CliError, ReportFormat};
use matchstate::summarize;
use serde::Serialize;
use std::path::PathBuf;

/// JSON-serializable match summary.
#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    name: &'a str,
    duration: u32,
    skipped_events: usize,
    events_without_effect: usize,
    participants: Vec<matchstate::reconstruct::ParticipantSummary>,
}

/// Execute the summary command.
///
/// # Errors
///
/// Returns an error if the config or replay cannot be loaded.
pub(crate) fn execute(
    config: Option<PathBuf>,
    replay: PathBuf,
    format: ReportFormat,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let (reconstructor, replay) = open(config, &replay)?;
    let state = reconstructor.state(&replay);
    let summary = summarize(&state);

    match format {
        ReportFormat::Text => print!(
            "{}",
            format_summary_text(
                &replay.name,
                replay.duration(),
                replay.skipped,
                state.events_without_effect(),
                &summary,
            )
        ),
        ReportFormat::Json => {
            let json = JsonSummary {
                name: &replay.name,
                duration: replay.duration(),
                skipped_events: replay.skipped,
                events_without_effect: state.events_without_effect(),
                participants: summary,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
