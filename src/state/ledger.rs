//! Unit ledger: identity, ownership and lifecycle of every unit instance.
//!
//! A unit moves through `registered → alive → dead` exactly once. Its
//! birth, type changes and death arrive as separate events, so every
//! operation tolerates ids it has never seen.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::state::{is_worker, ParticipantId, Seconds, UnitId, ValueModel};

/// A single unit instance.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInstance {
    /// Unique identity within the match.
    pub id: UnitId,
    /// Current unit type name.
    pub type_name: String,
    /// Owning participant. Never changes after registration.
    pub owner: ParticipantId,
    /// Normalized value, absent for unit types the value model does not know.
    pub value: Option<f64>,
    /// Whether the current type is worker-class.
    pub economic: bool,
    /// Time the unit was registered.
    pub registered_at: Seconds,
    /// Time the unit died, if it has.
    pub died_at: Option<Seconds>,
}

impl UnitInstance {
    /// Whether the unit is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.died_at.is_none()
    }

    /// Amount this unit adds to its owner's live army value.
    #[must_use]
    pub fn army_contribution(&self) -> f64 {
        match self.value {
            Some(value) if !self.economic && self.is_alive() => value,
            _ => 0.0,
        }
    }
}

/// Change in a unit's live army contribution caused by a type change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Revaluation {
    /// Owner of the re-valued unit.
    pub owner: ParticipantId,
    /// Army contribution before the type change.
    pub before: f64,
    /// Army contribution after the type change.
    pub after: f64,
}

impl Revaluation {
    /// Net change to apply to the owner's army value.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }
}

/// Last known state of a unit at the moment it died.
#[derive(Debug, Clone, PartialEq)]
pub struct Casualty {
    /// The dead unit.
    pub unit_id: UnitId,
    /// Owner of the dead unit.
    pub owner: ParticipantId,
    /// Type at time of death.
    pub type_name: String,
    /// Value at time of death.
    pub value: Option<f64>,
    /// Whether the unit was worker-class.
    pub economic: bool,
    /// Participant credited with the kill, if any.
    pub killer: Option<ParticipantId>,
    /// Time of death.
    pub time: Seconds,
}

/// Owns every unit instance seen in a match.
#[derive(Debug, Clone)]
pub struct UnitLedger {
    model: ValueModel,
    participants: BTreeSet<ParticipantId>,
    units: HashMap<UnitId, UnitInstance>,
    live_count: usize,
}

impl UnitLedger {
    /// Create an empty ledger for the given participants.
    #[must_use]
    pub fn new(model: ValueModel, participants: impl IntoIterator<Item = ParticipantId>) -> Self {
        Self {
            model,
            participants: participants.into_iter().collect(),
            units: HashMap::new(),
            live_count: 0,
        }
    }

    /// The value model used to price units.
    #[must_use]
    pub fn model(&self) -> &ValueModel {
        &self.model
    }

    /// Register a new unit.
    ///
    /// Returns `None` without changing anything when the id was already
    /// registered (alive or dead) or the owner is not a participant.
    pub fn register(
        &mut self,
        id: UnitId,
        type_name: &str,
        owner: ParticipantId,
        time: Seconds,
    ) -> Option<&UnitInstance> {
        if self.units.contains_key(&id) || !self.participants.contains(&owner) {
            return None;
        }

        let (value, economic) = self.price(type_name);
        let unit = UnitInstance {
            id,
            type_name: type_name.to_string(),
            owner,
            value,
            economic,
            registered_at: time,
            died_at: None,
        };
        self.live_count += 1;
        Some(self.units.entry(id).or_insert(unit))
    }

    /// Change the type of a live unit and re-price it.
    ///
    /// Returns `None` for unknown or dead units.
    pub fn retype(&mut self, id: UnitId, new_type: &str, _time: Seconds) -> Option<Revaluation> {
        let (value, economic) = self.price(new_type);
        let unit = self.units.get_mut(&id).filter(|u| u.is_alive())?;

        let before = unit.army_contribution();
        unit.type_name = new_type.to_string();
        unit.value = value;
        unit.economic = economic;

        Some(Revaluation {
            owner: unit.owner,
            before,
            after: unit.army_contribution(),
        })
    }

    /// Mark a unit dead.
    ///
    /// Returns the unit's last known state the first time it is called for
    /// an id, and `None` for unknown or already dead units.
    pub fn kill(
        &mut self,
        id: UnitId,
        killer: Option<ParticipantId>,
        time: Seconds,
    ) -> Option<Casualty> {
        let unit = self.units.get_mut(&id).filter(|u| u.is_alive())?;
        unit.died_at = Some(time);
        self.live_count -= 1;

        Some(Casualty {
            unit_id: id,
            owner: unit.owner,
            type_name: unit.type_name.clone(),
            value: unit.value,
            economic: unit.economic,
            killer,
            time,
        })
    }

    /// Whether a unit is registered and alive.
    #[must_use]
    pub fn is_alive(&self, id: UnitId) -> bool {
        self.units.get(&id).is_some_and(UnitInstance::is_alive)
    }

    /// Owner of a unit, alive or dead.
    #[must_use]
    pub fn owner_of(&self, id: UnitId) -> Option<ParticipantId> {
        self.units.get(&id).map(|u| u.owner)
    }

    /// Look up a unit, alive or dead.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitInstance> {
        self.units.get(&id)
    }

    /// All live units owned by a participant.
    pub fn live_units(&self, owner: ParticipantId) -> impl Iterator<Item = &UnitInstance> {
        self.units
            .values()
            .filter(move |u| u.owner == owner && u.is_alive())
    }

    /// Live unit counts by type for a participant.
    #[must_use]
    pub fn composition(&self, owner: ParticipantId) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for unit in self.live_units(owner) {
            *counts.entry(unit.type_name.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Sum of live army contributions for a participant, recomputed from scratch.
    #[must_use]
    pub fn live_army_value(&self, owner: ParticipantId) -> f64 {
        self.live_units(owner).map(UnitInstance::army_contribution).sum()
    }

    /// Number of live units across all participants.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Number of units ever registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether no unit was ever registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn price(&self, type_name: &str) -> (Option<f64>, bool) {
        match self.model.valuation(type_name) {
            Some(v) => (Some(v.value), v.economic),
            None => (None, is_worker(type_name)),
        }
    }
}
