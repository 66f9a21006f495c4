//! Replay sources: where the ordered event list comes from.
//!
//! Decoding the proprietary replay container happens outside this crate.
//! A [`ReplaySource`] hands over the already-decoded participant list and
//! tracker events; [`JsonReplay`] reads the decoder's JSON dump.

mod json;

pub use json::{JsonReplay, MalformedEvent, RawEvent, RawPlayer, ReplayDump};

use std::path::PathBuf;

use crate::event::TrackerEvent;
use crate::state::{Participant, Seconds};

/// Minimum number of participants for a match to be reconstructed.
pub const MIN_PARTICIPANTS: usize = 2;

/// A decoded match, ready for reconstruction.
#[derive(Debug, Clone)]
pub struct Replay {
    /// Human-readable match name (usually the file stem).
    pub name: String,
    /// Participants in source order.
    pub participants: Vec<Participant>,
    /// Match length as reported by the source, if any.
    pub duration: Option<Seconds>,
    /// Tracker events in arrival order.
    pub events: Vec<TrackerEvent>,
    /// Number of source events dropped while decoding.
    pub skipped: usize,
}

impl Replay {
    /// Match length: the reported duration, or the last event's time.
    #[must_use]
    pub fn duration(&self) -> Seconds {
        let last_event = self.events.iter().map(TrackerEvent::time).max().unwrap_or(0);
        self.duration.unwrap_or(last_event)
    }
}

/// Error produced when a source cannot deliver a match at all.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Reading the replay failed.
    #[error("failed to read replay {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The replay envelope is not valid.
    #[error("failed to parse replay {path}: {source}")]
    Json {
        /// File that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The replay has too few playing participants.
    #[error("replay has {found} participants, at least {MIN_PARTICIPANTS} required")]
    TooFewParticipants {
        /// Number of participants found.
        found: usize,
    },
}

/// Something that can produce a decoded match.
pub trait ReplaySource {
    /// Load the match.
    ///
    /// # Errors
    ///
    /// Returns an error if no event list can be produced for this match.
    fn load(&self) -> Result<Replay, SourceError>;
}

impl ReplaySource for Replay {
    fn load(&self) -> Result<Replay, SourceError> {
        if self.participants.len() < MIN_PARTICIPANTS {
            return Err(SourceError::TooFewParticipants {
                found: self.participants.len(),
            });
        }
        Ok(self.clone())
    }
}
