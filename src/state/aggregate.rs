//! Per-participant military and economic totals.
//!
//! Totals are driven entirely by the unit ledger's outcomes: registrations
//! add to the live army, type changes re-value it, and deaths move value
//! from the live army into the loss and kill counters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{Casualty, ParticipantId, Revaluation, UnitInstance};

/// Running totals for one participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateState {
    /// Value of live non-worker units.
    pub army_value: f64,
    /// Army value this participant has destroyed.
    pub killed_army_value: f64,
    /// Army value this participant has lost.
    pub lost_army_value: f64,
    /// Worker value this participant has destroyed.
    pub killed_economic_value: f64,
    /// Worker value this participant has lost.
    pub lost_economic_value: f64,
}

/// Aggregate totals for every participant of a match.
#[derive(Debug, Clone)]
pub struct AggregateTracker {
    states: BTreeMap<ParticipantId, AggregateState>,
}

impl AggregateTracker {
    /// Create zeroed totals for each participant.
    #[must_use]
    pub fn new(participants: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            states: participants
                .into_iter()
                .map(|id| (id, AggregateState::default()))
                .collect(),
        }
    }

    /// Totals for a participant.
    #[must_use]
    pub fn get(&self, id: ParticipantId) -> Option<&AggregateState> {
        self.states.get(&id)
    }

    /// Iterate over all participants' totals in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, &AggregateState)> {
        self.states.iter().map(|(id, state)| (*id, state))
    }

    /// Account for a newly registered unit.
    pub fn on_register(&mut self, unit: &UnitInstance) {
        let contribution = unit.army_contribution();
        if contribution > 0.0 {
            if let Some(state) = self.states.get_mut(&unit.owner) {
                state.army_value += contribution;
            }
        }
    }

    /// Account for a unit whose type changed.
    pub fn on_revalue(&mut self, change: &Revaluation) {
        if let Some(state) = self.states.get_mut(&change.owner) {
            state.army_value = (state.army_value + change.delta()).max(0.0);
        }
    }

    /// Account for a unit death.
    ///
    /// Units without a value change nothing. Self-kills and kills by unknown
    /// participants only count as losses.
    pub fn on_death(&mut self, casualty: &Casualty) {
        let Some(value) = casualty.value else {
            return;
        };

        let Some(victim) = self.states.get_mut(&casualty.owner) else {
            return;
        };
        if casualty.economic {
            victim.lost_economic_value += value;
        } else {
            victim.lost_army_value += value;
            victim.army_value = (victim.army_value - value).max(0.0);
        }

        let Some(killer_id) = casualty.killer.filter(|&k| k != casualty.owner) else {
            return;
        };
        if let Some(killer) = self.states.get_mut(&killer_id) {
            if casualty.economic {
                killer.killed_economic_value += value;
            } else {
                killer.killed_army_value += value;
            }
        }
    }
}
