//! The world oracle: everything the colony layer asks of the voxel world.
//!
//! Terrain, entity placement and randomness all live on the other side of
//! this trait. The colony code never inspects blocks directly; it only asks
//! "can a structure go here", "where is the surface", and "spawn this".

use colony_types::{AgentRef, PlayerId, Position, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Read-only view of a spawned agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Reference to the agent.
    pub id: AgentRef,
    /// Registered kind the agent was spawned as.
    pub kind: String,
    /// Current continuous position.
    pub position: Vec3,
    /// Owning player.
    pub owner: PlayerId,
    /// Whether the agent is still alive.
    pub alive: bool,
}

/// Queries and side effects against the voxel world.
pub trait WorldOracle {
    /// Whether a structure may occupy `position` (the cell is free).
    fn can_place_structure_at(&self, position: Position) -> bool;

    /// Y of the first free cell above the topmost solid block of a column.
    fn surface_height_at(&self, x: i32, z: i32) -> i32;

    /// Sample `count` positions within `radius` blocks of `center` on
    /// each axis.
    fn sample_random_positions_near(
        &mut self,
        center: Position,
        radius: i32,
        count: usize,
    ) -> Vec<Position>;

    /// Spawn an agent of a registered kind, owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAgentKind`] if `kind` is not registered.
    fn spawn_agent(
        &mut self,
        kind: &str,
        position: Position,
        owner: PlayerId,
    ) -> Result<AgentRef, WorldError>;

    /// Look up an agent by reference.
    fn agent(&self, id: AgentRef) -> Option<AgentSnapshot>;
}
