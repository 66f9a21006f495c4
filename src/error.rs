//! Top-level error type for reconstructing a match.

use crate::config::ConfigError;
use crate::source::SourceError;

/// Error that stops a single match from being reconstructed.
///
/// Malformed events and unknown entities never surface here; they are
/// skipped during decoding or ignored by the state machine.
#[derive(Debug, thiserror::Error)]
pub enum ReconstructError {
    /// The replay source could not deliver the match.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The reconstruction parameters are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for reconstruction entry points.
pub type ReconstructResult<T> = Result<T, ReconstructError>;
