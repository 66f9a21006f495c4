//! Fixed-length grouping of interval rows.

use serde::Serialize;

use crate::snapshot::Snapshot;
use crate::state::Seconds;

/// A run of interval rows that fall in the same window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchWindow<'a> {
    /// Window number, counting from zero.
    pub index: u32,
    /// Exclusive lower bound of the window (row 0 excepted).
    pub start: Seconds,
    /// Inclusive upper bound of the window.
    pub end: Seconds,
    /// Rows in the window, in time order.
    pub rows: &'a [Snapshot],
}

/// Window that a row stamped `time` belongs to.
///
/// Window `k` covers `(k*window, (k+1)*window]`; time 0 joins window 0.
#[must_use]
pub fn window_index(time: Seconds, window: Seconds) -> u32 {
    time.saturating_sub(1) / window.max(1)
}

/// Split time-ordered interval rows into windows. Empty windows are skipped.
#[must_use]
pub fn batch_windows(rows: &[Snapshot], window: Seconds) -> Vec<BatchWindow<'_>> {
    let window = window.max(1);
    rows.chunk_by(|a, b| window_index(a.time, window) == window_index(b.time, window))
        .map(|rows| {
            let index = window_index(rows[0].time, window);
            BatchWindow {
                index,
                start: index.saturating_mul(window),
                end: index.saturating_add(1).saturating_mul(window),
                rows,
            }
        })
        .collect()
}
