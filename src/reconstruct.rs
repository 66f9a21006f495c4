//! Reconstruction entry points.
//!
//! A [`Reconstructor`] holds validated parameters and the value table, and
//! turns a decoded [`Replay`] into state, interval rows, checkpoints or a
//! full [`MatchReport`].

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::config::{ConfigError, ReconstructionConfig};
use crate::error::ReconstructResult;
use crate::snapshot::{
    batch_windows, capture_checkpoints, interval_snapshots, BatchWindow, Checkpoint, CheckpointRun,
    Snapshot,
};
use crate::source::{Replay, ReplaySource};
use crate::state::{
    assert_invariants, AggregateState, MatchState, ParticipantId, Seconds, ValueModel,
};

/// Apply every event of a replay to a fresh state.
#[must_use]
pub fn reconstruct(replay: &Replay, model: ValueModel) -> MatchState {
    let mut state = MatchState::new(replay.participants.clone(), model);
    state.apply_all(&replay.events);
    assert_invariants(&state);

    info!(
        replay = %replay.name,
        events = state.events_applied(),
        without_effect = state.events_without_effect(),
        units = state.ledger().len(),
        samples = state.samples().len(),
        "reconstructed match"
    );
    state
}

/// Interval rows together with the state they were taken from.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// State after the whole stream.
    pub state: MatchState,
    /// Interval rows in time order.
    pub snapshots: Vec<Snapshot>,
}

impl Timeline {
    /// Group the rows into fixed-length windows.
    #[must_use]
    pub fn windows(&self, window: Seconds) -> Vec<BatchWindow<'_>> {
        batch_windows(&self.snapshots, window)
    }
}

/// Final totals for one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantSummary {
    /// Participant id.
    pub participant: ParticipantId,
    /// Display name.
    pub name: String,
    /// Faction label.
    pub faction: String,
    /// Aggregate totals at the end of the match.
    pub totals: AggregateState,
    /// Live unit counts by type at the end of the match.
    pub units: BTreeMap<String, u32>,
    /// Completed upgrades.
    pub upgrades: Vec<String>,
    /// Number of resource samples recorded.
    pub samples: usize,
}

/// End-of-match summary for every participant.
#[must_use]
pub fn summarize(state: &MatchState) -> Vec<ParticipantSummary> {
    state
        .participants()
        .iter()
        .map(|p| ParticipantSummary {
            participant: p.id,
            name: p.name.clone(),
            faction: p.faction.clone(),
            totals: state.aggregate(p.id).unwrap_or_default(),
            units: state.ledger().composition(p.id),
            upgrades: state.upgrades(p.id).to_vec(),
            samples: state.samples().series(p.id).len(),
        })
        .collect()
}

/// Everything reconstructed for one match, as written by batch runs.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// Match name.
    pub name: String,
    /// Match length in seconds.
    pub duration: Seconds,
    /// Source events dropped while decoding.
    pub skipped_events: usize,
    /// Decoded events that changed nothing.
    pub events_without_effect: usize,
    /// Final per-participant totals.
    pub summary: Vec<ParticipantSummary>,
    /// Interval rows.
    pub snapshots: Vec<Snapshot>,
    /// Checkpoints reached by the stream.
    pub checkpoints: Vec<Checkpoint>,
}

/// Reconstructs matches with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Reconstructor {
    config: ReconstructionConfig,
    model: ValueModel,
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self {
            config: ReconstructionConfig::default(),
            model: ValueModel::standard(),
        }
    }
}

impl Reconstructor {
    /// Create a reconstructor from a config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn new(config: ReconstructionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let model = config.value_model();
        Ok(Self { config, model })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// The active value table.
    #[must_use]
    pub fn model(&self) -> &ValueModel {
        &self.model
    }

    /// Load a match from a source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot deliver the match.
    pub fn load<S: ReplaySource + ?Sized>(&self, source: &S) -> ReconstructResult<Replay> {
        Ok(source.load()?)
    }

    /// Final state of a match.
    #[must_use]
    pub fn state(&self, replay: &Replay) -> MatchState {
        reconstruct(replay, self.model.clone())
    }

    /// Interval-mode rows for a match.
    #[must_use]
    pub fn timeline(&self, replay: &Replay) -> Timeline {
        let state = self.state(replay);
        let snapshots = interval_snapshots(
            &state,
            &replay.events,
            self.config.interval_seconds,
            replay.duration(),
        );
        Timeline { state, snapshots }
    }

    /// Checkpoint-mode capture for a match.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured checkpoints are not ascending.
    pub fn checkpoints(&self, replay: &Replay) -> ReconstructResult<CheckpointRun> {
        capture_checkpoints(replay, self.model.clone(), &self.config.checkpoints)
    }

    /// Full report for a match: summary, interval rows and checkpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured checkpoints are not ascending.
    pub fn report(&self, replay: &Replay) -> ReconstructResult<MatchReport> {
        let timeline = self.timeline(replay);
        let run = self.checkpoints(replay)?;

        Ok(MatchReport {
            name: replay.name.clone(),
            duration: replay.duration(),
            skipped_events: replay.skipped,
            events_without_effect: timeline.state.events_without_effect(),
            summary: summarize(&timeline.state),
            snapshots: timeline.snapshots,
            checkpoints: run.checkpoints,
        })
    }
}
