//! Timeline command implementation.

use super::output::{format_timeline_csv, format_timeline_text, format_windows_csv};
use super::{load_config, open, CliError, TimelineFormat};
use std::path::PathBuf;

/// Execute the timeline command.
///
/// # Errors
///
/// Returns an error if the config or replay cannot be loaded.
pub(crate) fn execute(
    config: Option<PathBuf>,
    replay: PathBuf,
    interval: Option<u32>,
    window: Option<u32>,
    format: TimelineFormat,
) -> Result<(), CliError> {
    let mut config = load_config(config.as_deref())?;
    if let Some(step) = interval {
        config.interval_seconds = step;
    }
    if let Some(w) = window {
        config.batch_window_seconds = w;
    }

    let (reconstructor, replay) = open(config, &replay)?;
    let timeline = reconstructor.timeline(&replay);

    if timeline.snapshots.is_empty() {
        tracing::warn!(replay = %replay.name, "no interval rows produced");
    }

    match format {
        TimelineFormat::Text => {
            if window.is_some() {
                for w in timeline.windows(reconstructor.config().batch_window_seconds) {
                    println!("== window {} ({}s..{}s] ==", w.index, w.start, w.end);
                    print!("{}", format_timeline_text(w.rows));
                }
            } else {
                print!("{}", format_timeline_text(&timeline.snapshots));
            }
        }
        TimelineFormat::Json => {
            let json = if window.is_some() {
                serde_json::to_string_pretty(
                    &timeline.windows(reconstructor.config().batch_window_seconds),
                )?
            } else {
                serde_json::to_string_pretty(&timeline.snapshots)?
            };
            println!("{json}");
        }
        TimelineFormat::Csv => {
            if window.is_some() {
                let windows = timeline.windows(reconstructor.config().batch_window_seconds);
                print!("{}", format_windows_csv(&windows));
            } else {
                print!("{}", format_timeline_csv(&timeline.snapshots));
            }
        }
    }

    Ok(())
}
