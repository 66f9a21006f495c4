//! Reconstructed state of a single match.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::event::TrackerEvent;
use crate::state::{
    AggregateState, AggregateTracker, Participant, ParticipantId, SampleStore, Seconds,
    UnitLedger, ValueModel,
};

/// Complete reconstruction state for one match.
///
/// Built once from the participant list, fed every event in stream order
/// through [`MatchState::apply`], and read-only afterwards.
#[derive(Debug, Clone)]
pub struct MatchState {
    participants: Vec<Participant>,
    ledger: UnitLedger,
    aggregates: AggregateTracker,
    samples: SampleStore,
    upgrades: BTreeMap<ParticipantId, Vec<String>>,
    clock: Seconds,
    applied: usize,
    no_effect: usize,
}

impl MatchState {
    /// Create an empty state for the given participants.
    ///
    /// A participant whose id is already listed is ignored.
    #[must_use]
    pub fn new(mut participants: Vec<Participant>, model: ValueModel) -> Self {
        let mut seen = BTreeSet::new();
        participants.retain(|p| seen.insert(p.id));
        let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
        Self {
            ledger: UnitLedger::new(model, ids.iter().copied()),
            aggregates: AggregateTracker::new(ids.iter().copied()),
            samples: SampleStore::new(ids.iter().copied()),
            upgrades: ids.iter().map(|&id| (id, Vec::new())).collect(),
            participants,
            clock: 0,
            applied: 0,
            no_effect: 0,
        }
    }

    /// Apply one event.
    ///
    /// Returns `true` if the event changed the state. Events referencing
    /// unknown units or participants, duplicate registrations and repeated
    /// deaths change nothing.
    pub fn apply(&mut self, event: &TrackerEvent) -> bool {
        self.clock = self.clock.max(event.time());
        self.applied += 1;

        let changed = match event {
            TrackerEvent::PlayerStats {
                time,
                participant,
                stats,
            } => match self.aggregates.get(*participant).copied() {
                Some(totals) => self.samples.record(*participant, *time, *stats, totals),
                None => false,
            },
            TrackerEvent::UnitRegistered {
                time,
                unit_id,
                type_name,
                owner,
            } => match self.ledger.register(*unit_id, type_name, *owner, *time) {
                Some(unit) => {
                    self.aggregates.on_register(unit);
                    true
                }
                None => false,
            },
            TrackerEvent::UnitRetyped {
                time,
                unit_id,
                type_name,
            } => match self.ledger.retype(*unit_id, type_name, *time) {
                Some(change) => {
                    self.aggregates.on_revalue(&change);
                    true
                }
                None => false,
            },
            TrackerEvent::UnitDied {
                time,
                unit_id,
                killer,
            } => match self.ledger.kill(*unit_id, *killer, *time) {
                Some(casualty) => {
                    self.aggregates.on_death(&casualty);
                    true
                }
                None => false,
            },
            TrackerEvent::UpgradeCompleted {
                participant,
                upgrade,
                ..
            } => match self.upgrades.get_mut(participant) {
                Some(done) if !done.contains(upgrade) => {
                    done.push(upgrade.clone());
                    true
                }
                _ => false,
            },
        };

        if !changed {
            self.no_effect += 1;
            debug!(kind = event.kind(), time = event.time(), "event had no effect");
        }
        changed
    }

    /// Apply every event in order.
    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a TrackerEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Participants in source order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Look up a participant by id.
    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// The unit ledger.
    #[must_use]
    pub fn ledger(&self) -> &UnitLedger {
        &self.ledger
    }

    /// Aggregate totals for all participants.
    #[must_use]
    pub fn aggregates(&self) -> &AggregateTracker {
        &self.aggregates
    }

    /// Current totals for one participant.
    #[must_use]
    pub fn aggregate(&self, id: ParticipantId) -> Option<AggregateState> {
        self.aggregates.get(id).copied()
    }

    /// Recorded resource samples.
    #[must_use]
    pub fn samples(&self) -> &SampleStore {
        &self.samples
    }

    /// Upgrades completed by a participant, in completion order.
    #[must_use]
    pub fn upgrades(&self, id: ParticipantId) -> &[String] {
        self.upgrades.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Time of the latest event applied so far.
    #[must_use]
    pub const fn clock(&self) -> Seconds {
        self.clock
    }

    /// Number of events applied.
    #[must_use]
    pub const fn events_applied(&self) -> usize {
        self.applied
    }

    /// Number of applied events that changed nothing.
    #[must_use]
    pub const fn events_without_effect(&self) -> usize {
        self.no_effect
    }
}
