//! Interval mode: fixed-step rows over a finished match.

use serde::{Deserialize, Serialize};

use crate::event::TrackerEvent;
use crate::state::{MatchState, ParticipantId, ResourceSample, Seconds};

/// One participant's sample within an interval row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerFrame {
    /// Participant the sample belongs to.
    pub participant: ParticipantId,
    /// Latest sample at or before the row time.
    #[serde(flatten)]
    pub sample: ResourceSample,
}

/// Composite view of every participant at one time step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Row time.
    pub time: Seconds,
    /// One frame per participant, in participant order.
    pub players: Vec<PlayerFrame>,
}

impl Snapshot {
    /// Frame for one participant.
    #[must_use]
    pub fn player(&self, id: ParticipantId) -> Option<&PlayerFrame> {
        self.players.iter().find(|p| p.participant == id)
    }

    /// Build the row at `time`, or `None` if any participant has no sample yet.
    fn at(state: &MatchState, time: Seconds) -> Option<Self> {
        let players = state
            .participants()
            .iter()
            .map(|p| {
                state
                    .samples()
                    .latest_at(p.id, time)
                    .map(|sample| PlayerFrame {
                        participant: p.id,
                        sample: *sample,
                    })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { time, players })
    }
}

/// Produce interval rows for a fully reconstructed match.
///
/// Rows are stamped `0, step, 2*step, ...` strictly below `end`. A row is
/// dropped when any participant has no sample at or before its time. When
/// `end` is not a multiple of `step`, the last interval `(last_step, end]` is
/// shorter than a step and gets one more row stamped at `end`, provided some
/// event falls inside it.
#[must_use]
pub fn interval_snapshots(
    state: &MatchState,
    events: &[TrackerEvent],
    step: Seconds,
    end: Seconds,
) -> Vec<Snapshot> {
    if step == 0 || end == 0 || state.participants().is_empty() {
        return Vec::new();
    }

    let mut rows: Vec<Snapshot> = (0..end)
        .step_by(step as usize)
        .filter_map(|t| Snapshot::at(state, t))
        .collect();

    if end % step == 0 {
        return rows;
    }

    let last_step = end / step * step;
    let tail_has_events = events
        .iter()
        .map(TrackerEvent::time)
        .any(|t| t > last_step && t <= end);
    if tail_has_events {
        if let Some(row) = Snapshot::at(state, end) {
            rows.push(row);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Participant, ResourceStats, ValueModel};

    fn stats(time: Seconds, participant: ParticipantId, minerals: f64) -> TrackerEvent {
        TrackerEvent::PlayerStats {
            time,
            participant,
            stats: ResourceStats {
                minerals,
                ..ResourceStats::default()
            },
        }
    }

    fn replayed(events: &[TrackerEvent]) -> MatchState {
        let mut state = MatchState::new(
            vec![
                Participant::new(1, "Alpha", "Terran"),
                Participant::new(2, "Beta", "Zerg"),
            ],
            ValueModel::standard(),
        );
        state.apply_all(events);
        state
    }

    #[test]
    fn test_rows_wait_for_every_participant() {
        let events = vec![stats(0, 1, 50.0), stats(10, 2, 60.0), stats(20, 1, 70.0)];
        let state = replayed(&events);
        let rows = interval_snapshots(&state, &events, 5, 20);

        let times: Vec<_> = rows.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![10, 15, 20]);
        assert_eq!(rows[0].player(1).unwrap().sample.stats.minerals, 50.0);
        assert_eq!(rows[2].player(1).unwrap().sample.stats.minerals, 70.0);
    }

    #[test]
    fn test_step_rows_strictly_below_end() {
        let events = vec![stats(0, 1, 0.0), stats(0, 2, 0.0)];
        let state = replayed(&events);
        let rows = interval_snapshots(&state, &events, 7, 21);

        let times: Vec<_> = rows.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![0, 7, 14]);
    }

    #[test]
    fn test_partial_interval_row_at_end() {
        let events = vec![stats(0, 1, 0.0), stats(0, 2, 0.0), stats(23, 1, 5.0)];
        let state = replayed(&events);
        let rows = interval_snapshots(&state, &events, 7, 23);

        let times: Vec<_> = rows.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![0, 7, 14, 21, 23]);
        assert_eq!(rows[4].player(1).unwrap().sample.stats.minerals, 5.0);
    }

    #[test]
    fn test_no_partial_row_without_tail_events() {
        let events = vec![stats(0, 1, 0.0), stats(0, 2, 0.0)];
        let state = replayed(&events);
        let rows = interval_snapshots(&state, &events, 7, 23);
        assert_eq!(rows.last().unwrap().time, 21);
    }

    #[test]
    fn test_no_partial_row_when_end_is_a_step() {
        let events = vec![stats(0, 1, 0.0), stats(0, 2, 0.0), stats(18, 1, 5.0)];
        let state = replayed(&events);
        let rows = interval_snapshots(&state, &events, 7, 21);

        let times: Vec<_> = rows.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![0, 7, 14]);
    }

    #[test]
    fn test_empty_inputs() {
        let state = replayed(&[]);
        assert!(interval_snapshots(&state, &[], 7, 100).is_empty());
        assert!(interval_snapshots(&state, &[], 0, 100).is_empty());
        assert!(interval_snapshots(&state, &[], 7, 0).is_empty());
    }

    #[test]
    fn test_frame_serializes_flat() {
        let events = vec![stats(0, 1, 50.0), stats(0, 2, 60.0)];
        let state = replayed(&events);
        let rows = interval_snapshots(&state, &events, 7, 7);

        let json = serde_json::to_value(&rows[0]).unwrap();
        let frame = &json["players"][0];
        assert_eq!(frame["participant"], 1);
        assert_eq!(frame["minerals"], 50.0);
        assert_eq!(frame["army_value"], 0.0);
    }
}
