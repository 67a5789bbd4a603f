//! Deterministic in-memory world used by the headless engine and by tests.
//!
//! The terrain is a flat slab: every cell below `ground_level` is solid and
//! everything above is free, except for individually placed blocks. Random
//! sampling uses a seeded [`StdRng`] so runs are reproducible.

use std::collections::{BTreeMap, BTreeSet};

use colony_types::{AgentRef, PlayerId, Position, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::WorldError;
use crate::oracle::{AgentSnapshot, WorldOracle};

/// Agent kind registered by [`FlatWorld::new`].
pub const COLONIST_KIND: &str = "colonist";

/// A flat, seeded world.
#[derive(Debug, Clone)]
pub struct FlatWorld {
    ground_level: i32,
    solids: BTreeSet<Position>,
    agent_kinds: BTreeSet<String>,
    agents: BTreeMap<AgentRef, AgentSnapshot>,
    rng: StdRng,
}

impl FlatWorld {
    /// Create a world whose surface is at `ground_level`, with the
    /// [`COLONIST_KIND`] agent kind registered.
    pub fn new(ground_level: i32, seed: u64) -> Self {
        let mut agent_kinds = BTreeSet::new();
        agent_kinds.insert(COLONIST_KIND.to_owned());
        Self {
            ground_level,
            solids: BTreeSet::new(),
            agent_kinds,
            agents: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Register an additional agent kind.
    pub fn register_agent_kind(&mut self, kind: &str) {
        self.agent_kinds.insert(kind.to_owned());
    }

    /// Remove an agent kind, so spawning it fails.
    pub fn unregister_agent_kind(&mut self, kind: &str) {
        self.agent_kinds.remove(kind);
    }

    /// Place a solid block.
    pub fn place_block(&mut self, position: Position) {
        self.solids.insert(position);
    }

    /// Remove a placed block. The ground slab cannot be removed.
    pub fn clear_block(&mut self, position: Position) {
        self.solids.remove(&position);
    }

    /// Move an existing agent.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if the reference is unknown.
    pub fn move_agent(&mut self, id: AgentRef, position: Vec3) -> Result<(), WorldError> {
        let agent = self.agents.get_mut(&id).ok_or(WorldError::AgentNotFound(id))?;
        agent.position = position;
        Ok(())
    }

    /// Mark an agent dead.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if the reference is unknown.
    pub fn kill_agent(&mut self, id: AgentRef) -> Result<(), WorldError> {
        let agent = self.agents.get_mut(&id).ok_or(WorldError::AgentNotFound(id))?;
        agent.alive = false;
        Ok(())
    }

    /// All agents owned by `owner`.
    pub fn agents_owned_by(&self, owner: PlayerId) -> Vec<&AgentSnapshot> {
        self.agents.values().filter(|a| a.owner == owner).collect()
    }

    /// Total number of spawned agents, dead or alive.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    fn is_solid(&self, position: Position) -> bool {
        position.y < self.ground_level || self.solids.contains(&position)
    }
}

impl WorldOracle for FlatWorld {
    fn can_place_structure_at(&self, position: Position) -> bool {
        !self.is_solid(position)
    }

    fn surface_height_at(&self, x: i32, z: i32) -> i32 {
        self.solids
            .iter()
            .filter(|p| p.x == x && p.z == z)
            .map(|p| p.y.saturating_add(1))
            .fold(self.ground_level, i32::max)
    }

    fn sample_random_positions_near(
        &mut self,
        center: Position,
        radius: i32,
        count: usize,
    ) -> Vec<Position> {
        let radius = radius.max(0);
        (0..count)
            .map(|_| {
                center.offset(
                    self.rng.random_range(-radius..=radius),
                    self.rng.random_range(-radius..=radius),
                    self.rng.random_range(-radius..=radius),
                )
            })
            .collect()
    }

    fn spawn_agent(
        &mut self,
        kind: &str,
        position: Position,
        owner: PlayerId,
    ) -> Result<AgentRef, WorldError> {
        if !self.agent_kinds.contains(kind) {
            return Err(WorldError::UnknownAgentKind(kind.to_owned()));
        }
        let id = AgentRef::new();
        self.agents.insert(
            id,
            AgentSnapshot {
                id,
                kind: kind.to_owned(),
                position: position.to_vec3(),
                owner,
                alive: true,
            },
        );
        debug!(agent = %id, kind, position = %position, owner = %owner, "agent spawned");
        Ok(id)
    }

    fn agent(&self, id: AgentRef) -> Option<AgentSnapshot> {
        self.agents.get(&id).cloned()
    }
}
