//! Checkpoint mode: state captured while the event stream is consumed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::check_ascending;
use crate::error::ReconstructResult;
use crate::source::Replay;
use crate::state::{
    assert_invariants, AggregateState, MatchState, ParticipantId, ResourceSample, Seconds,
    ValueModel,
};

/// One participant's state at a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointFrame {
    /// Participant id.
    pub participant: ParticipantId,
    /// Display name.
    pub name: String,
    /// Faction label.
    pub faction: String,
    /// Latest resource sample at or before the checkpoint, if any.
    pub sample: Option<ResourceSample>,
    /// Aggregate totals after every event up to the checkpoint.
    pub totals: AggregateState,
    /// Live unit counts by type.
    pub units: BTreeMap<String, u32>,
    /// Upgrades completed so far, in completion order.
    pub upgrades: Vec<String>,
}

/// Immutable copy of the match state at a checkpoint time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint time.
    pub time: Seconds,
    /// One frame per participant, in participant order.
    pub players: Vec<CheckpointFrame>,
}

impl Checkpoint {
    /// Copy the current state out as a checkpoint stamped `time`.
    #[must_use]
    pub fn capture(state: &MatchState, time: Seconds) -> Self {
        let players = state
            .participants()
            .iter()
            .map(|p| CheckpointFrame {
                participant: p.id,
                name: p.name.clone(),
                faction: p.faction.clone(),
                sample: state.samples().latest_at(p.id, time).copied(),
                totals: state.aggregate(p.id).unwrap_or_default(),
                units: state.ledger().composition(p.id),
                upgrades: state.upgrades(p.id).to_vec(),
            })
            .collect();
        Self { time, players }
    }

    /// Frame for one participant.
    #[must_use]
    pub fn player(&self, id: ParticipantId) -> Option<&CheckpointFrame> {
        self.players.iter().find(|p| p.participant == id)
    }
}

/// Result of a checkpoint-mode pass over a match.
#[derive(Debug, Clone)]
pub struct CheckpointRun {
    /// State after the whole stream.
    pub state: MatchState,
    /// Checkpoints reached by the stream, in ascending order.
    pub checkpoints: Vec<Checkpoint>,
}

/// Replay a match once, capturing state at each checkpoint.
///
/// A checkpoint `t` is captured when the first event stamped after `t`
/// arrives, before that event is applied. Checkpoints the stream reaches
/// only with its final events are captured at stream end. Checkpoints
/// past the last event are never captured.
///
/// # Errors
///
/// Returns an error if `checkpoints` is not strictly ascending.
pub fn capture_checkpoints(
    replay: &Replay,
    model: ValueModel,
    checkpoints: &[Seconds],
) -> ReconstructResult<CheckpointRun> {
    check_ascending(checkpoints)?;

    let mut state = MatchState::new(replay.participants.clone(), model);
    let mut pending = checkpoints.iter().copied().peekable();
    let mut captured = Vec::with_capacity(checkpoints.len());

    for event in &replay.events {
        while let Some(t) = pending.next_if(|&t| event.time() > t) {
            debug!(checkpoint = t, trigger = event.time(), "capturing checkpoint");
            captured.push(Checkpoint::capture(&state, t));
        }
        state.apply(event);
    }

    if !replay.events.is_empty() {
        let reached = state.clock();
        while let Some(t) = pending.next_if(|&t| t <= reached) {
            captured.push(Checkpoint::capture(&state, t));
        }
    }

    assert_invariants(&state);
    Ok(CheckpointRun {
        state,
        checkpoints: captured,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconstructError;
    use crate::event::TrackerEvent;
    use crate::state::{Participant, ResourceStats};

    fn replay(events: Vec<TrackerEvent>) -> Replay {
        Replay {
            name: "test".to_string(),
            participants: vec![
                Participant::new(1, "Alpha", "Terran"),
                Participant::new(2, "Beta", "Protoss"),
            ],
            duration: None,
            events,
            skipped: 0,
        }
    }

    fn born(time: Seconds, unit_id: u64, type_name: &str, owner: ParticipantId) -> TrackerEvent {
        TrackerEvent::UnitRegistered {
            time,
            unit_id,
            type_name: type_name.to_string(),
            owner,
        }
    }

    fn stats(time: Seconds, participant: ParticipantId) -> TrackerEvent {
        TrackerEvent::PlayerStats {
            time,
            participant,
            stats: ResourceStats::default(),
        }
    }

    #[test]
    fn test_checkpoint_before_triggering_event() {
        let events = vec![born(10, 1, "Marine", 1), born(30, 2, "Marine", 1)];
        let run = capture_checkpoints(&replay(events), ValueModel::standard(), &[20]).unwrap();

        assert_eq!(run.checkpoints.len(), 1);
        let frame = run.checkpoints[0].player(1).unwrap();
        assert_eq!(frame.totals.army_value, 50.0);
        assert_eq!(frame.units.get("Marine"), Some(&1));
        assert_eq!(run.state.aggregate(1).unwrap().army_value, 100.0);
    }

    #[test]
    fn test_event_at_checkpoint_time_is_included() {
        let events = vec![born(20, 1, "Marine", 1), born(21, 2, "Marine", 1)];
        let run = capture_checkpoints(&replay(events), ValueModel::standard(), &[20]).unwrap();
        assert_eq!(run.checkpoints[0].player(1).unwrap().totals.army_value, 50.0);
    }

    #[test]
    fn test_final_event_reaches_checkpoint() {
        let events = vec![born(5, 1, "Marine", 1), stats(60, 1)];
        let run = capture_checkpoints(&replay(events), ValueModel::standard(), &[60, 120]).unwrap();

        assert_eq!(run.checkpoints.len(), 1);
        assert_eq!(run.checkpoints[0].time, 60);
        assert_eq!(run.checkpoints[0].player(1).unwrap().sample.unwrap().time, 60);
    }

    #[test]
    fn test_unreached_checkpoints_not_emitted() {
        let events = vec![born(5, 1, "Marine", 1)];
        let run = capture_checkpoints(&replay(events), ValueModel::standard(), &[120, 240]).unwrap();
        assert!(run.checkpoints.is_empty());

        let run = capture_checkpoints(&replay(Vec::new()), ValueModel::standard(), &[0]).unwrap();
        assert!(run.checkpoints.is_empty());
    }

    #[test]
    fn test_one_event_passes_several_checkpoints() {
        let events = vec![born(5, 1, "Marine", 1), born(500, 2, "Marine", 2)];
        let run =
            capture_checkpoints(&replay(events), ValueModel::standard(), &[120, 240, 360]).unwrap();

        let times: Vec<_> = run.checkpoints.iter().map(|c| c.time).collect();
        assert_eq!(times, vec![120, 240, 360]);
        assert!(run.checkpoints.iter().all(|c| c.player(2).unwrap().units.is_empty()));
    }

    #[test]
    fn test_checkpoint_is_a_copy() {
        let events = vec![
            born(5, 1, "Marine", 1),
            TrackerEvent::UnitDied {
                time: 90,
                unit_id: 1,
                killer: Some(2),
            },
        ];
        let run = capture_checkpoints(&replay(events), ValueModel::standard(), &[60]).unwrap();

        let frame = run.checkpoints[0].player(1).unwrap();
        assert_eq!(frame.totals.army_value, 50.0);
        assert_eq!(frame.totals.lost_army_value, 0.0);
        assert_eq!(run.state.aggregate(1).unwrap().lost_army_value, 50.0);
    }

    #[test]
    fn test_unsorted_checkpoints_rejected() {
        let err =
            capture_checkpoints(&replay(Vec::new()), ValueModel::standard(), &[240, 120]).unwrap_err();
        assert!(matches!(err, ReconstructError::Config(_)));
    }
}
