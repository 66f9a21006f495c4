// Allow unwrap and exact float comparison in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::float_cmp))]
//! Matchstate: continuous match state rebuilt from replay tracker events.
//!
//! A replay's tracker stream is sparse: a unit's birth, type changes and
//! death arrive as separate events, and economy figures arrive as periodic
//! reports. This crate replays that stream once and produces:
//! - Per-participant army value and kill/loss totals
//! - Fixed-interval rows over the whole match
//! - Checkpoints captured at chosen timestamps
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Reconstructor / snapshot modes    │
//! ├─────────────────────────────────────┤
//! │ MatchState: ledger, totals, samples │
//! ├─────────────────────────────────────┤
//! │   Replay source (decoded events)    │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod reconstruct;
pub mod snapshot;
pub mod source;
pub mod state;

pub use config::{ConfigError, ReconstructionConfig};
pub use error::{ReconstructError, ReconstructResult};
pub use event::TrackerEvent;
pub use reconstruct::{reconstruct, summarize, MatchReport, Reconstructor, Timeline};
pub use snapshot::{Checkpoint, Snapshot};
pub use source::{JsonReplay, Replay, ReplaySource, SourceError};

// Re-export key state types at crate root for convenience
pub use state::{AggregateState, MatchState, Participant, ParticipantId, Seconds, UnitId};
