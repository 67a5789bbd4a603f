//! Messages exchanged between a colony's server authority and its client.
//!
//! Framing is the transport's business; these are the typed payloads plus the
//! name of the channel each one travels on. Clientbound sync messages are full
//! overwrites, so applying one twice is harmless.

use serde::{Deserialize, Serialize};

use crate::area::AreaInfo;
use crate::enums::{GameMode, ProfessionChange};
use crate::position::Position;

/// Channel carrying [`ColonySync`] payloads.
pub const CHANNEL_COLONY_SYNC: &str = "colony_manager_sync";
/// Channel carrying automation area snapshots.
pub const CHANNEL_AREAS_SYNC: &str = "colony_areas_sync";
/// Channel carrying center placement requests.
pub const CHANNEL_SET_CENTER: &str = "colony_set_center";
/// Channel carrying game mode requests.
pub const CHANNEL_SET_GAME_MODE: &str = "colony_set_game_mode";
/// Channel carrying hire-with-screen requests.
pub const CHANNEL_HIRE_PAWN: &str = "hire_pawn_with_screen";
/// Channel carrying profession headcount changes.
pub const CHANNEL_PROFESSION_STATE: &str = "colony_change_profession_state";

/// Full authoritative colony state as mirrored to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonySync {
    /// Current population count.
    pub population: i32,
    /// Confirmed center, if any.
    pub center: Option<Position>,
    /// Current game mode.
    pub mode: GameMode,
    /// Whether the client is attached to a live authority.
    pub connected: bool,
    /// Population capacity ceiling.
    pub max_population: i32,
    /// Colonists promised but not yet spawned.
    pub reserved_population: i32,
}

/// Server to client messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientboundMessage {
    /// Overwrite the client's colony mirror.
    SyncColony(ColonySync),
    /// Overwrite the client's area snapshots.
    SyncAreas {
        /// Every area currently owned by the server registry.
        areas: Vec<AreaInfo>,
    },
}

impl ClientboundMessage {
    /// Name of the channel this message travels on.
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::SyncColony(_) => CHANNEL_COLONY_SYNC,
            Self::SyncAreas { .. } => CHANNEL_AREAS_SYNC,
        }
    }
}

/// Client to server requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerboundMessage {
    /// Establish the colony center.
    SetCenter {
        /// Requested center position.
        position: Position,
    },
    /// Choose the colony game mode.
    SetGameMode {
        /// Requested mode; never [`GameMode::Unset`].
        mode: GameMode,
    },
    /// Send a hire request to whatever hire screen is open.
    HirePawn {
        /// Profession being hired.
        profession: String,
    },
    /// Add or remove one colonist from a profession.
    ChangeProfessionState {
        /// Profession id.
        profession: String,
        /// Direction of the change.
        change: ProfessionChange,
    },
}

impl ServerboundMessage {
    /// Name of the channel this message travels on.
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::SetCenter { .. } => CHANNEL_SET_CENTER,
            Self::SetGameMode { .. } => CHANNEL_SET_GAME_MODE,
            Self::HirePawn { .. } => CHANNEL_HIRE_PAWN,
            Self::ChangeProfessionState { .. } => CHANNEL_PROFESSION_STATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_message_has_its_own_channel() {
        let sync = ClientboundMessage::SyncAreas { areas: Vec::new() };
        assert_eq!(sync.channel(), CHANNEL_AREAS_SYNC);
        let hire = ServerboundMessage::HirePawn {
            profession: String::from("miner"),
        };
        assert_eq!(hire.channel(), CHANNEL_HIRE_PAWN);
    }

    #[test]
    fn sync_payload_is_tagged_json() {
        let msg = ClientboundMessage::SyncColony(ColonySync {
            population: 5,
            center: Some(Position::new(1, 64, -3)),
            mode: GameMode::Survival,
            connected: true,
            max_population: 10,
            reserved_population: 0,
        });
        let value = serde_json::to_value(&msg).unwrap_or_default();
        assert_eq!(value.get("type").and_then(|v| v.as_str()), Some("SyncColony"));
        assert_eq!(value.get("population").and_then(serde_json::Value::as_i64), Some(5));
    }
}
