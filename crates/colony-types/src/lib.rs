//! Shared type definitions for colony state synchronization.
//!
//! Everything that crosses the boundary between a colony's server authority
//! and its client mirror is defined here, so both halves agree on the shape
//! of identifiers, positions, messages and persisted records.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for players, agents, areas, buildings
//! - [`position`] -- Integer block [`Position`] and continuous [`Vec3`]
//! - [`enums`] -- Game mode, interaction mode, area kinds, profession changes
//! - [`area`] -- Immutable [`AreaInfo`] snapshots
//! - [`messages`] -- Clientbound/serverbound payloads and channel names
//! - [`record`] -- The named-field [`Record`] used for persistence

pub mod area;
pub mod enums;
pub mod ids;
pub mod messages;
pub mod position;
pub mod record;

// Re-export all public types at crate root for convenience.
pub use area::AreaInfo;
pub use enums::{AreaKind, GameMode, InteractionMode, ProfessionChange};
pub use ids::{AgentRef, AreaId, BuildingId, PlayerId};
pub use messages::{
    CHANNEL_AREAS_SYNC, CHANNEL_COLONY_SYNC, CHANNEL_HIRE_PAWN, CHANNEL_PROFESSION_STATE,
    CHANNEL_SET_CENTER, CHANNEL_SET_GAME_MODE, ClientboundMessage, ColonySync, ServerboundMessage,
};
pub use position::{Position, Vec3};
pub use record::{Record, RecordError};
