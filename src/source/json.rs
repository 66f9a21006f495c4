//! JSON replay dumps.
//!
//! The external decoder writes one JSON document per match:
//!
//! ```json
//! {
//!   "players": [{ "pid": 1, "name": "Alpha", "play_race": "Zerg" }],
//!   "duration_seconds": 812,
//!   "events": [{ "event": "UnitBornEvent", "second": 0, "unit_id": 1, ... }]
//! }
//! ```
//!
//! Event records keep the decoder's field names. Each record is decoded on
//! its own, so a malformed record costs one event, not the whole match.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::event::TrackerEvent;
use crate::source::{Replay, ReplaySource, SourceError, MIN_PARTICIPANTS};
use crate::state::{Participant, ParticipantId, ResourceStats, Seconds, UnitId};

/// Top-level document written by the decoder.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayDump {
    /// Player list, including observers.
    pub players: Vec<RawPlayer>,
    /// Match length in seconds.
    #[serde(default)]
    pub duration_seconds: Option<Seconds>,
    /// Raw tracker event records in arrival order.
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

/// A player entry as written by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayer {
    /// Player id.
    pub pid: Option<ParticipantId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Played race.
    #[serde(default, alias = "race")]
    pub play_race: Option<String>,
    /// Observers do not play.
    #[serde(default)]
    pub is_observer: bool,
    /// Referees do not play.
    #[serde(default)]
    pub is_referee: bool,
}

/// A single event record as written by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    /// Decoder event class name, e.g. `UnitBornEvent`.
    #[serde(alias = "name")]
    pub event: String,
    /// Game second of the event.
    pub second: Option<Seconds>,
    /// Player id for per-player events.
    pub pid: Option<ParticipantId>,
    /// Unit id for unit events.
    pub unit_id: Option<UnitId>,
    /// Unit type name for unit events.
    pub unit_type_name: Option<String>,
    /// Controlling player of a new unit.
    pub control_pid: Option<ParticipantId>,
    /// Upkeep player of a new unit, used when no controller is given.
    pub upkeep_pid: Option<ParticipantId>,
    /// Player credited with a kill.
    pub killer_pid: Option<ParticipantId>,
    /// Upgrade name for upgrade events.
    pub upgrade_type_name: Option<String>,
    /// Mineral collection rate.
    pub minerals_collection_rate: Option<f64>,
    /// Gas collection rate.
    pub vespene_collection_rate: Option<f64>,
    /// Unspent minerals.
    pub minerals_current: Option<f64>,
    /// Unspent gas.
    pub vespene_current: Option<f64>,
    /// Supply used.
    pub food_used: Option<f64>,
    /// Supply provided.
    pub food_made: Option<f64>,
}

/// A record that names a known event kind but lacks a required field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{event} is missing required field `{field}`")]
pub struct MalformedEvent {
    /// Decoder event class name.
    pub event: String,
    /// First missing field.
    pub field: &'static str,
}

impl RawEvent {
    /// Convert into a typed event.
    ///
    /// Returns `Ok(None)` for event kinds the reconstruction does not use.
    ///
    /// # Errors
    ///
    /// Returns an error if a field required by the event kind is missing.
    pub fn into_event(self) -> Result<Option<TrackerEvent>, MalformedEvent> {
        let event = match self.event.as_str() {
            "PlayerStatsEvent" => TrackerEvent::PlayerStats {
                time: self.require(self.second, "second")?,
                participant: self.require(self.pid, "pid")?,
                stats: ResourceStats {
                    mineral_rate: self
                        .require(self.minerals_collection_rate, "minerals_collection_rate")?,
                    gas_rate: self.require(self.vespene_collection_rate, "vespene_collection_rate")?,
                    minerals: self.require(self.minerals_current, "minerals_current")?,
                    gas: self.require(self.vespene_current, "vespene_current")?,
                    supply_used: self.require(self.food_used, "food_used")?,
                    supply_cap: self.require(self.food_made, "food_made")?,
                },
            },
            "UnitBornEvent" | "UnitInitEvent" => TrackerEvent::UnitRegistered {
                time: self.require(self.second, "second")?,
                unit_id: self.require(self.unit_id, "unit_id")?,
                owner: self.require(self.control_pid.or(self.upkeep_pid), "control_pid")?,
                type_name: self.require(self.unit_type_name.clone(), "unit_type_name")?,
            },
            "UnitTypeChangeEvent" => TrackerEvent::UnitRetyped {
                time: self.require(self.second, "second")?,
                unit_id: self.require(self.unit_id, "unit_id")?,
                type_name: self.require(self.unit_type_name.clone(), "unit_type_name")?,
            },
            "UnitDiedEvent" => TrackerEvent::UnitDied {
                time: self.require(self.second, "second")?,
                unit_id: self.require(self.unit_id, "unit_id")?,
                killer: self.killer_pid,
            },
            "UpgradeCompleteEvent" => TrackerEvent::UpgradeCompleted {
                time: self.require(self.second, "second")?,
                participant: self.require(self.pid, "pid")?,
                upgrade: self.require(self.upgrade_type_name.clone(), "upgrade_type_name")?,
            },
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    fn require<T>(&self, value: Option<T>, field: &'static str) -> Result<T, MalformedEvent> {
        value.ok_or_else(|| MalformedEvent {
            event: self.event.clone(),
            field,
        })
    }
}

impl ReplayDump {
    /// Parse a dump from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid dump envelope.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Decode the dump into a replay.
    ///
    /// Observers, referees and players without an id are dropped. A
    /// repeated player id keeps its first entry. Event records that cannot
    /// be decoded are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two distinct playing participants
    /// remain.
    pub fn into_replay(self, name: impl Into<String>) -> Result<Replay, SourceError> {
        let mut seen = HashSet::new();
        let participants: Vec<Participant> = self
            .players
            .into_iter()
            .filter(|p| !p.is_observer && !p.is_referee)
            .filter_map(|p| {
                let id = p.pid?;
                if !seen.insert(id) {
                    warn!(pid = id, "dropping repeated player entry");
                    return None;
                }
                Some(Participant::new(
                    id,
                    p.name.unwrap_or_else(|| format!("Player {id}")),
                    p.play_race.unwrap_or_else(|| "Unknown".to_string()),
                ))
            })
            .collect();

        if participants.len() < MIN_PARTICIPANTS {
            return Err(SourceError::TooFewParticipants {
                found: participants.len(),
            });
        }

        let mut events = Vec::with_capacity(self.events.len());
        let mut skipped = 0;
        for value in self.events {
            let raw: RawEvent = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!(error = %e, "skipping undecodable event record");
                    skipped += 1;
                    continue;
                }
            };
            match raw.into_event() {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(e) => {
                    debug!(error = %e, "skipping malformed event");
                    skipped += 1;
                }
            }
        }

        Ok(Replay {
            name: name.into(),
            participants,
            duration: self.duration_seconds,
            events,
            skipped,
        })
    }
}

/// A replay dump on disk.
#[derive(Debug, Clone)]
pub struct JsonReplay {
    path: PathBuf,
}

impl JsonReplay {
    /// Point at a dump file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the dump file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Match name derived from the file stem.
    #[must_use]
    pub fn match_name(&self) -> String {
        self.path
            .file_stem()
            .map_or_else(|| "unknown".to_string(), |s| s.to_string_lossy().to_string())
    }
}

impl ReplaySource for JsonReplay {
    fn load(&self) -> Result<Replay, SourceError> {
        let text = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let dump = ReplayDump::parse(&text).map_err(|source| SourceError::Json {
            path: self.path.clone(),
            source,
        })?;
        let replay = dump.into_replay(self.match_name())?;

        info!(
            replay = %replay.name,
            participants = replay.participants.len(),
            events = replay.events.len(),
            skipped = replay.skipped,
            "loaded replay"
        );
        Ok(replay)
    }
}
