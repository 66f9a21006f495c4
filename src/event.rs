//! Typed tracker events consumed by the reconstruction.
//!
//! Each variant carries exactly the fields the state machine needs. Events
//! that are missing a required field never become a [`TrackerEvent`]; the
//! replay source drops them while decoding.

use serde::{Deserialize, Serialize};

use crate::state::{ParticipantId, ResourceStats, Seconds, UnitId};

/// A single event from the replay's tracker stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// Periodic economy report for one participant.
    PlayerStats {
        /// Event time.
        time: Seconds,
        /// Reporting participant.
        participant: ParticipantId,
        /// Reported figures.
        stats: ResourceStats,
    },
    /// A unit was born or started construction.
    UnitRegistered {
        /// Event time.
        time: Seconds,
        /// New unit's identity.
        unit_id: UnitId,
        /// Unit type name.
        type_name: String,
        /// Controlling participant.
        owner: ParticipantId,
    },
    /// A unit morphed into another type.
    UnitRetyped {
        /// Event time.
        time: Seconds,
        /// Affected unit.
        unit_id: UnitId,
        /// New type name.
        type_name: String,
    },
    /// A unit died.
    UnitDied {
        /// Event time.
        time: Seconds,
        /// Dead unit.
        unit_id: UnitId,
        /// Participant credited with the kill.
        killer: Option<ParticipantId>,
    },
    /// A participant finished researching an upgrade.
    UpgradeCompleted {
        /// Event time.
        time: Seconds,
        /// Researching participant.
        participant: ParticipantId,
        /// Upgrade name.
        upgrade: String,
    },
}

impl TrackerEvent {
    /// Time the event occurred.
    #[must_use]
    pub fn time(&self) -> Seconds {
        match self {
            Self::PlayerStats { time, .. }
            | Self::UnitRegistered { time, .. }
            | Self::UnitRetyped { time, .. }
            | Self::UnitDied { time, .. }
            | Self::UpgradeCompleted { time, .. } => *time,
        }
    }

    /// Short name of the event kind, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerStats { .. } => "player_stats",
            Self::UnitRegistered { .. } => "unit_registered",
            Self::UnitRetyped { .. } => "unit_retyped",
            Self::UnitDied { .. } => "unit_died",
            Self::UpgradeCompleted { .. } => "upgrade_completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_time() {
        let event = TrackerEvent::UnitDied {
            time: 42,
            unit_id: 7,
            killer: None,
        };
        assert_eq!(event.time(), 42);
        assert_eq!(event.kind(), "unit_died");
    }

    #[test]
    fn test_event_json_tag() {
        let event = TrackerEvent::UpgradeCompleted {
            time: 300,
            participant: 1,
            upgrade: "Stimpack".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"upgrade_completed\""));
    }
}
