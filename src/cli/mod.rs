//! CLI command implementations for Matchstate.

pub(crate) mod batch;
pub(crate) mod checkpoints;
pub(crate) mod summary;
pub(crate) mod timeline;

mod output;

use clap::ValueEnum;
use matchstate::{JsonReplay, ReconstructionConfig, Reconstructor, Replay, ReplaySource};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `timeline` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TimelineFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format, one line per participant per row.
    Csv,
}

/// Output format for the `checkpoints` and `summary` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

impl From<matchstate::ConfigError> for CliError {
    fn from(e: matchstate::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<matchstate::SourceError> for CliError {
    fn from(e: matchstate::SourceError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<matchstate::ReconstructError> for CliError {
    fn from(e: matchstate::ReconstructError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the config file if one was given, otherwise the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<ReconstructionConfig, CliError> {
    match path {
        Some(path) => Ok(ReconstructionConfig::load(path)?),
        None => Ok(ReconstructionConfig::default()),
    }
}

/// Build a reconstructor and load one replay dump.
pub(crate) fn open(
    config: ReconstructionConfig,
    replay: &Path,
) -> Result<(Reconstructor, Replay), CliError> {
    let reconstructor = Reconstructor::new(config)?;
    let replay = JsonReplay::new(replay).load()?;
    Ok((reconstructor, replay))
}
