//! Enumeration types shared by the server and client halves of a colony.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Game mode
// ---------------------------------------------------------------------------

/// Gameplay rules governing a colony.
///
/// [`GameMode::Unset`] is the transient state of a fresh colony: the player
/// must pick one of the other two before normal ticking proceeds, and it is
/// never a valid target of a mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// No mode chosen yet.
    #[default]
    Unset,
    /// Unlimited resources.
    Creative,
    /// Resources must be gathered.
    Survival,
}

impl GameMode {
    /// Stable string form used in persisted records.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Creative => "creative",
            Self::Survival => "survival",
        }
    }

    /// Parse the persisted string form. Unknown strings read as `Unset`.
    pub fn from_persisted(value: &str) -> Self {
        match value {
            "creative" => Self::Creative,
            "survival" => Self::Survival,
            _ => Self::Unset,
        }
    }
}

// ---------------------------------------------------------------------------
// Client interaction mode
// ---------------------------------------------------------------------------

/// What the player is currently doing with the colony UI (client only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Placing blueprints and following colonists.
    #[default]
    Build,
    /// Commanding units; clicks become area selections.
    Combat,
    /// Drawing automation areas.
    AreasSelection,
}

// ---------------------------------------------------------------------------
// Automation area kinds
// ---------------------------------------------------------------------------

/// Kind of an automation area, matched against requirement strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaKind {
    /// Crop fields tended by farmers.
    Farming,
    /// Quarry zones worked by miners.
    Mining,
    /// Tree plots cut by lumberjacks.
    Logging,
}

impl AreaKind {
    /// Requirement prefix this kind satisfies.
    pub const fn requirement_prefix(self) -> &'static str {
        match self {
            Self::Farming => "farm",
            Self::Mining => "miner",
            Self::Logging => "lumberjack",
        }
    }

    /// Whether an area of this kind satisfies the given requirement id.
    pub fn satisfies(self, requirement: &str) -> bool {
        requirement.starts_with(self.requirement_prefix())
    }

    /// Stable string form used in persisted records.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Farming => "farming",
            Self::Mining => "mining",
            Self::Logging => "logging",
        }
    }

    /// Parse the persisted string form.
    pub fn from_persisted(value: &str) -> Option<Self> {
        match value {
            "farming" => Some(Self::Farming),
            "mining" => Some(Self::Mining),
            "logging" => Some(Self::Logging),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Profession changes
// ---------------------------------------------------------------------------

/// Direction of a requested profession headcount change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfessionChange {
    /// One more colonist in this profession.
    Add,
    /// One fewer colonist in this profession.
    Remove,
}
