//! Match participants.

use serde::{Deserialize, Serialize};

/// Identifier of a participant, as assigned by the replay source.
pub type ParticipantId = u8;

/// One side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Identifier used by events to reference this participant.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Faction label (e.g. the played race).
    pub faction: String,
}

impl Participant {
    /// Create a new participant.
    #[must_use]
    pub fn new(id: ParticipantId, name: impl Into<String>, faction: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            faction: faction.into(),
        }
    }
}
