//! Unit value model: resource cost table and worker classification.
//!
//! Every unit type is reduced to a single scalar:
//!
//! value = minerals + gas × [`GAS_WEIGHT`]
//!
//! Unknown unit types have no value and are excluded from all accounting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Weight applied to gas cost when computing a unit's value.
pub const GAS_WEIGHT: f64 = 1.5;

/// Worker-class unit types. Their losses count as economic damage.
///
/// `MULE` is a worker but has no cost entry, so it never carries value.
const WORKERS: [&str; 4] = ["SCV", "Probe", "Drone", "MULE"];

/// Built-in cost table: (name, minerals, gas, supply).
const UNIT_COSTS: [(&str, u32, u32, f64); 47] = [
    // Terran
    ("SCV", 50, 0, 1.0),
    ("Marine", 50, 0, 1.0),
    ("Marauder", 100, 25, 2.0),
    ("SiegeTank", 150, 125, 3.0),
    ("Medivac", 100, 100, 2.0),
    ("Thor", 300, 200, 6.0),
    ("VikingFighter", 150, 75, 2.0),
    ("Liberator", 150, 150, 3.0),
    ("Ghost", 150, 125, 2.0),
    ("Hellion", 100, 0, 2.0),
    ("WidowMine", 75, 25, 2.0),
    ("Cyclone", 150, 100, 3.0),
    ("Raven", 100, 200, 2.0),
    ("Banshee", 150, 100, 3.0),
    ("Battlecruiser", 400, 300, 6.0),
    ("Reaper", 50, 50, 1.0),
    // Protoss
    ("Probe", 50, 0, 1.0),
    ("Zealot", 100, 0, 2.0),
    ("Stalker", 125, 50, 2.0),
    ("Immortal", 275, 100, 4.0),
    ("Colossus", 300, 200, 6.0),
    ("Carrier", 350, 250, 6.0),
    ("Archon", 175, 275, 4.0),
    ("VoidRay", 250, 150, 4.0),
    ("Sentry", 50, 100, 2.0),
    ("Adept", 100, 25, 2.0),
    ("HighTemplar", 50, 150, 2.0),
    ("DarkTemplar", 125, 125, 2.0),
    ("Oracle", 150, 150, 3.0),
    ("Tempest", 250, 175, 5.0),
    ("WarpPrism", 200, 0, 2.0),
    ("Observer", 25, 75, 1.0),
    // Zerg
    ("Drone", 50, 0, 1.0),
    ("Zergling", 25, 0, 0.5),
    ("Roach", 75, 25, 2.0),
    ("Hydralisk", 100, 50, 2.0),
    ("Ravager", 100, 100, 3.0),
    ("Lurker", 150, 150, 3.0),
    ("Mutalisk", 100, 100, 2.0),
    ("Corruptor", 150, 100, 2.0),
    ("Ultralisk", 300, 200, 6.0),
    ("Queen", 150, 0, 2.0),
    ("Baneling", 50, 25, 0.5),
    ("Viper", 100, 200, 3.0),
    ("SwarmHost", 100, 75, 3.0),
    ("BroodLord", 300, 250, 4.0),
    ("Overlord", 100, 0, 0.0),
];

/// Resource cost of a single unit type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitCost {
    /// Mineral cost.
    pub minerals: u32,
    /// Gas cost.
    pub gas: u32,
    /// Supply consumed.
    #[serde(default)]
    pub supply: f64,
}

impl UnitCost {
    /// Normalized value: minerals plus weighted gas.
    #[must_use]
    pub fn value(&self) -> f64 {
        f64::from(self.minerals) + f64::from(self.gas) * GAS_WEIGHT
    }
}

/// Value and classification of a recognized unit type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    /// Normalized value of one unit of this type.
    pub value: f64,
    /// Whether this is a worker-class unit.
    pub economic: bool,
}

/// Lookup table from unit type name to cost.
#[derive(Debug, Clone)]
pub struct ValueModel {
    costs: HashMap<String, UnitCost>,
}

impl Default for ValueModel {
    fn default() -> Self {
        Self::standard()
    }
}

impl ValueModel {
    /// The built-in cost table.
    #[must_use]
    pub fn standard() -> Self {
        let costs = UNIT_COSTS
            .iter()
            .map(|&(name, minerals, gas, supply)| {
                (
                    name.to_string(),
                    UnitCost {
                        minerals,
                        gas,
                        supply,
                    },
                )
            })
            .collect();
        Self { costs }
    }

    /// An empty table. Every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            costs: HashMap::new(),
        }
    }

    /// Add or replace the cost of a unit type.
    pub fn insert(&mut self, name: impl Into<String>, cost: UnitCost) {
        self.costs.insert(name.into(), cost);
    }

    /// Extend the table, replacing existing entries with the same name.
    #[must_use]
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, UnitCost)>,
        S: Into<String>,
    {
        for (name, cost) in entries {
            self.insert(name, cost);
        }
        self
    }

    /// Cost of a unit type, if known.
    #[must_use]
    pub fn cost(&self, name: &str) -> Option<&UnitCost> {
        self.costs.get(name)
    }

    /// Value and classification of a unit type.
    ///
    /// Returns `None` for types missing from the table.
    #[must_use]
    pub fn valuation(&self, name: &str) -> Option<Valuation> {
        self.costs.get(name).map(|cost| Valuation {
            value: cost.value(),
            economic: is_worker(name),
        })
    }

    /// Number of known unit types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

/// Whether a unit type is worker-class.
#[must_use]
pub fn is_worker(name: &str) -> bool {
    WORKERS.contains(&name)
}
