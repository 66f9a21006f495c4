//! Periodic resource samples, one append-only series per participant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::{AggregateState, ParticipantId, Seconds};

/// Economy figures reported by a periodic stats event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceStats {
    /// Minerals gathered per minute.
    pub mineral_rate: f64,
    /// Gas gathered per minute.
    pub gas_rate: f64,
    /// Unspent minerals.
    pub minerals: f64,
    /// Unspent gas.
    pub gas: f64,
    /// Supply in use.
    pub supply_used: f64,
    /// Supply available.
    pub supply_cap: f64,
}

/// A participant's full economic and military picture at one instant.
///
/// The aggregate totals are copied in when the sample is recorded, so later
/// deaths never alter a sample already taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    /// Time of the stats event.
    pub time: Seconds,
    /// Resource figures.
    #[serde(flatten)]
    pub stats: ResourceStats,
    /// Aggregate totals at `time`.
    #[serde(flatten)]
    pub aggregates: AggregateState,
}

/// Time-ordered samples for every participant.
#[derive(Debug, Clone)]
pub struct SampleStore {
    series: BTreeMap<ParticipantId, Vec<ResourceSample>>,
}

impl SampleStore {
    /// Create empty series for each participant.
    #[must_use]
    pub fn new(participants: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            series: participants.into_iter().map(|id| (id, Vec::new())).collect(),
        }
    }

    /// Append a sample for a participant.
    ///
    /// Returns `false` when the participant is unknown or the sample is older
    /// than the participant's latest one; the series is left untouched.
    pub fn record(
        &mut self,
        participant: ParticipantId,
        time: Seconds,
        stats: ResourceStats,
        aggregates: AggregateState,
    ) -> bool {
        let Some(series) = self.series.get_mut(&participant) else {
            return false;
        };

        if let Some(last) = series.last() {
            if time < last.time {
                warn!(
                    participant,
                    time,
                    last = last.time,
                    "rejecting out-of-order resource sample"
                );
                return false;
            }
        }

        series.push(ResourceSample {
            time,
            stats,
            aggregates,
        });
        true
    }

    /// Most recent sample stamped at or before `time`.
    #[must_use]
    pub fn latest_at(&self, participant: ParticipantId, time: Seconds) -> Option<&ResourceSample> {
        let series = self.series.get(&participant)?;
        let idx = series.partition_point(|s| s.time <= time);
        idx.checked_sub(1).map(|i| &series[i])
    }

    /// Most recent sample regardless of time.
    #[must_use]
    pub fn latest(&self, participant: ParticipantId) -> Option<&ResourceSample> {
        self.series.get(&participant).and_then(|s| s.last())
    }

    /// Full series for a participant.
    #[must_use]
    pub fn series(&self, participant: ParticipantId) -> &[ResourceSample] {
        self.series.get(&participant).map_or(&[], Vec::as_slice)
    }

    /// Total number of samples across all participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// Whether no samples were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
