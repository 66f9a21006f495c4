//! Time-indexed views of a reconstructed match.
//!
//! Two ways to sample the same state:
//! - Interval mode walks fixed steps over the finished match.
//! - Checkpoint mode captures state while the event stream is consumed.
//!
//! Both follow the same boundary rule: a view at time `t` reflects every
//! event stamped at or before `t`.

mod checkpoint;
mod interval;
mod window;

pub use checkpoint::{capture_checkpoints, Checkpoint, CheckpointFrame, CheckpointRun};
pub use interval::{interval_snapshots, PlayerFrame, Snapshot};
pub use window::{batch_windows, window_index, BatchWindow};
