//! Match state reconstruction.
//!
//! Rebuilds continuous match state from the tracker event stream:
//! - Value model (unit cost table, worker classification)
//! - Unit ledger (identity, ownership, lifecycle)
//! - Aggregate tracker (army value, kills and losses)
//! - Resource sample store (periodic economy reports)

mod aggregate;
mod invariants;
mod ledger;
mod match_state;
mod participant;
mod samples;
mod value;

pub use aggregate::{AggregateState, AggregateTracker};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use ledger::{Casualty, Revaluation, UnitInstance, UnitLedger};
pub use match_state::MatchState;
pub use participant::{Participant, ParticipantId};
pub use samples::{ResourceSample, ResourceStats, SampleStore};
pub use value::{is_worker, UnitCost, Valuation, ValueModel, GAS_WEIGHT};

/// Match time in whole game seconds.
pub type Seconds = u32;

/// Identity of a unit instance. Never reused within a match.
pub type UnitId = u64;
