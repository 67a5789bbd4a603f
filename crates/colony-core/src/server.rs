//! Authoritative colony state.
//!
//! [`ColonyServerState`] is the single source of truth for a colony's center,
//! population and game mode. Mutations only flip a dirty flag; the one and
//! only network write happens in [`ColonyServerState::tick`], which sends a
//! single full-state sync when the flag is set. Any number of mutations
//! between two ticks therefore coalesce into one message.

use colony_types::{AgentRef, ClientboundMessage, ColonySync, GameMode, PlayerId, Position, Record};
use colony_world::WorldOracle;
use tracing::{debug, info, warn};

use crate::config::ColonySettings;
use crate::error::ColonyError;
use crate::transport::ServerTransport;

const KEY_POPULATION: &str = "population";
const KEY_CENTER_X: &str = "centerX";
const KEY_CENTER_Y: &str = "centerY";
const KEY_CENTER_Z: &str = "centerZ";
const KEY_MODE: &str = "gameMode";

/// Server-side record of one player's colony.
#[derive(Debug, Clone)]
pub struct ColonyServerState {
    owner: PlayerId,
    needs_sync: bool,
    center: Option<Position>,
    population: i32,
    reserved_population: i32,
    max_population: i32,
    mode: GameMode,
    settings: ColonySettings,
}

impl ColonyServerState {
    /// Create the state for a colony owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::InvalidArgument`] if `owner` is the nil id.
    pub fn new(owner: PlayerId, settings: ColonySettings) -> Result<Self, ColonyError> {
        if owner.is_nil() {
            return Err(ColonyError::invalid_argument("player id cannot be nil"));
        }
        Ok(Self {
            owner,
            needs_sync: false,
            center: None,
            population: 0,
            reserved_population: 0,
            max_population: settings.max_population,
            mode: GameMode::Unset,
            settings,
        })
    }

    /// Owning player.
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Confirmed center, if placed.
    pub const fn center(&self) -> Option<Position> {
        self.center
    }

    /// Authoritative population count. May be negative if removals
    /// outnumber additions.
    pub const fn population(&self) -> i32 {
        self.population
    }

    /// Colonists promised but not yet spawned.
    pub const fn reserved_population(&self) -> i32 {
        self.reserved_population
    }

    /// Capacity ceiling.
    pub const fn max_population(&self) -> i32 {
        self.max_population
    }

    /// Current game mode.
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// Whether a sync is pending for the next tick.
    pub const fn needs_sync(&self) -> bool {
        self.needs_sync
    }

    /// One more colonist.
    pub fn add_population(&mut self) {
        self.population = self.population.saturating_add(1);
        self.schedule_sync();
    }

    /// One fewer colonist. Not clamped: unmatched removals drive the count
    /// negative, which is logged.
    pub fn remove_population(&mut self) {
        self.population = self.population.saturating_sub(1);
        if self.population < 0 {
            warn!(
                owner = %self.owner,
                population = self.population,
                "population dropped below zero"
            );
        }
        self.schedule_sync();
    }

    /// Promise one colonist (e.g. an accepted hire).
    pub fn reserve_population(&mut self) {
        self.reserved_population = self.reserved_population.saturating_add(1);
        self.schedule_sync();
    }

    /// A promised colonist has arrived: move it from reserved to population.
    pub fn materialize_reserved(&mut self) {
        self.reserved_population = self.reserved_population.saturating_sub(1).max(0);
        self.add_population();
    }

    /// Raise or lower the capacity ceiling.
    pub fn set_max_population(&mut self, max_population: i32) {
        if self.max_population != max_population {
            self.max_population = max_population;
            self.schedule_sync();
        }
    }

    /// Establish the colony center and spawn the founding colonists around
    /// it, each owned by `requester`. Returns the spawned agents.
    ///
    /// # Errors
    ///
    /// - [`ColonyError::InvalidState`] if the center is already set; the
    ///   stored center is left unchanged.
    /// - [`ColonyError::InvalidArgument`] if `position` is `None`.
    /// - [`ColonyError::World`] if the colonist kind is not registered. The
    ///   center stays set in that case; a missing kind is a deployment error.
    pub fn setup_center(
        &mut self,
        position: Option<Position>,
        world: &mut dyn WorldOracle,
        requester: PlayerId,
    ) -> Result<Vec<AgentRef>, ColonyError> {
        if let Some(existing) = self.center {
            return Err(ColonyError::invalid_state(format!(
                "colony center already set at {existing}"
            )));
        }
        let center = position.ok_or_else(|| ColonyError::invalid_argument("center cannot be empty"))?;
        if requester.is_nil() {
            return Err(ColonyError::invalid_argument("requester id cannot be nil"));
        }
        self.center = Some(center);

        let count = usize::try_from(self.settings.initial_colonists).unwrap_or(usize::MAX);
        let samples =
            world.sample_random_positions_near(center, self.settings.spawn_radius, count);
        let mut spawned = Vec::with_capacity(samples.len());
        for sample in samples {
            let surface = Position::new(sample.x, world.surface_height_at(sample.x, sample.z), sample.z);
            let agent = world.spawn_agent(&self.settings.colonist_kind, surface, requester)?;
            debug!(agent = %agent, position = %surface, "founding colonist spawned");
            spawned.push(agent);
        }

        info!(
            owner = %self.owner,
            center = %center,
            colonists = spawned.len(),
            "colony center established"
        );
        self.schedule_sync();
        Ok(spawned)
    }

    /// Choose the game mode. `Unset` is never a valid target, and the mode
    /// can only be chosen once.
    ///
    /// # Errors
    ///
    /// - [`ColonyError::InvalidArgument`] if `mode` is [`GameMode::Unset`].
    /// - [`ColonyError::InvalidState`] if a mode was already chosen.
    pub fn set_game_mode(&mut self, mode: GameMode) -> Result<(), ColonyError> {
        if mode == GameMode::Unset {
            return Err(ColonyError::invalid_argument("game mode cannot be unset"));
        }
        if self.mode != GameMode::Unset {
            return Err(ColonyError::invalid_state(format!(
                "game mode already set to {}",
                self.mode.as_str()
            )));
        }
        self.mode = mode;
        info!(owner = %self.owner, mode = mode.as_str(), "game mode chosen");
        self.schedule_sync();
        Ok(())
    }

    /// The full state as mirrored to the client.
    pub const fn sync_payload(&self) -> ColonySync {
        ColonySync {
            population: self.population,
            center: self.center,
            mode: self.mode,
            connected: true,
            max_population: self.max_population,
            reserved_population: self.reserved_population,
        }
    }

    /// Send one sync to `requester` if anything changed since the last
    /// tick. Returns whether a message was sent.
    pub fn tick(&mut self, requester: PlayerId, transport: &mut dyn ServerTransport) -> bool {
        if !self.needs_sync {
            return false;
        }
        let payload = self.sync_payload();
        transport.deliver(requester, ClientboundMessage::SyncColony(payload));
        debug!(
            recipient = %requester,
            population = payload.population,
            has_center = payload.center.is_some(),
            "colony sync sent"
        );
        self.needs_sync = false;
        true
    }

    /// Write population, center and mode into `record`.
    ///
    /// The center is stored as three integers and omitted when unset.
    pub fn write(&self, record: &mut Record) {
        record.put_int(KEY_POPULATION, self.population);
        if let Some(center) = self.center {
            record.put_int(KEY_CENTER_X, center.x);
            record.put_int(KEY_CENTER_Y, center.y);
            record.put_int(KEY_CENTER_Z, center.z);
        }
        record.put_string(KEY_MODE, self.mode.as_str());
    }

    /// Persist into a fresh record.
    pub fn serialize(&self) -> Record {
        let mut record = Record::new();
        self.write(&mut record);
        record
    }

    /// Restore from `record`, overwriting population, center and mode, and
    /// schedule a sync so a connected client hears about the load.
    ///
    /// An all-zero center triple reads as "no center".
    pub fn deserialize(&mut self, record: &Record) {
        self.population = record.get_int(KEY_POPULATION);
        let (x, y, z) = (
            record.get_int(KEY_CENTER_X),
            record.get_int(KEY_CENTER_Y),
            record.get_int(KEY_CENTER_Z),
        );
        self.center = if x != 0 || y != 0 || z != 0 {
            Some(Position::new(x, y, z))
        } else {
            None
        };
        self.mode = GameMode::from_persisted(record.get_string(KEY_MODE));
        debug!(
            owner = %self.owner,
            population = self.population,
            has_center = self.center.is_some(),
            "colony state restored"
        );
        self.schedule_sync();
    }

    /// Force a full sync on the next tick.
    pub const fn schedule_sync(&mut self) {
        self.needs_sync = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::CHANNEL_COLONY_SYNC;
    use colony_world::{FlatWorld, WorldError};

    use super::*;
    use crate::transport::ServerOutbox;

    fn colony() -> ColonyServerState {
        ColonyServerState::new(PlayerId::new(), ColonySettings::default()).unwrap()
    }

    #[test]
    fn nil_owner_is_rejected() {
        let result = ColonyServerState::new(PlayerId::from(uuid::Uuid::nil()), ColonySettings::default());
        assert!(matches!(result, Err(ColonyError::InvalidArgument { .. })));
    }

    #[test]
    fn mutations_coalesce_into_one_sync() {
        let mut state = colony();
        let mut outbox = ServerOutbox::new();
        let player = state.owner();

        state.add_population();
        state.add_population();
        state.remove_population();
        state.add_population();

        assert!(state.tick(player, &mut outbox));
        assert!(!state.tick(player, &mut outbox));
        assert_eq!(outbox.count_on(CHANNEL_COLONY_SYNC), 1);

        let sent = outbox.sent().first().unwrap();
        assert_eq!(sent.recipient, player);
        assert!(matches!(
            sent.message,
            ClientboundMessage::SyncColony(ColonySync { population: 2, .. })
        ));
    }

    #[test]
    fn idle_tick_sends_nothing() {
        let mut state = colony();
        let mut outbox = ServerOutbox::new();
        let player = state.owner();
        for _ in 0..10 {
            assert!(!state.tick(player, &mut outbox));
        }
        assert!(outbox.sent().is_empty());
    }

    #[test]
    fn population_may_go_negative() {
        let mut state = colony();
        state.remove_population();
        state.remove_population();
        assert_eq!(state.population(), -2);
    }

    #[test]
    fn setup_center_spawns_owned_colonists_on_the_surface() {
        let mut state = colony();
        let mut world = FlatWorld::new(64, 3);
        let player = state.owner();
        let center = Position::new(10, 64, 10);

        let agents = state.setup_center(Some(center), &mut world, player).unwrap();

        assert_eq!(agents.len(), 5);
        assert_eq!(state.center(), Some(center));
        assert!(state.needs_sync());
        for agent in agents {
            let snapshot = world.agent(agent).unwrap();
            assert_eq!(snapshot.owner, player);
            assert!((snapshot.position.y - 64.0).abs() < f64::EPSILON);
            assert!((snapshot.position.x - 10.0).abs() <= 3.0);
        }
    }

    #[test]
    fn second_setup_center_fails_and_keeps_first() {
        let mut state = colony();
        let mut world = FlatWorld::new(64, 3);
        let player = state.owner();
        let first = Position::new(1, 64, 1);
        state.setup_center(Some(first), &mut world, player).unwrap();

        let result = state.setup_center(Some(Position::new(50, 64, 50)), &mut world, player);

        assert!(matches!(result, Err(ColonyError::InvalidState { .. })));
        assert_eq!(state.center(), Some(first));
        assert_eq!(world.agent_count(), 5);
    }

    #[test]
    fn missing_center_is_invalid_argument() {
        let mut state = colony();
        let mut world = FlatWorld::new(64, 3);
        let player = state.owner();
        let result = state.setup_center(None, &mut world, player);
        assert!(matches!(result, Err(ColonyError::InvalidArgument { .. })));
        assert!(state.center().is_none());
        assert!(!state.needs_sync());
    }

    #[test]
    fn unknown_colonist_kind_is_fatal() {
        let mut state = colony();
        let mut world = FlatWorld::new(64, 3);
        world.unregister_agent_kind("colonist");
        let player = state.owner();
        let result = state.setup_center(Some(Position::ORIGIN), &mut world, player);
        assert!(matches!(
            result,
            Err(ColonyError::World {
                source: WorldError::UnknownAgentKind(_)
            })
        ));
    }

    #[test]
    fn game_mode_is_chosen_once() {
        let mut state = colony();
        assert!(matches!(
            state.set_game_mode(GameMode::Unset),
            Err(ColonyError::InvalidArgument { .. })
        ));
        state.set_game_mode(GameMode::Survival).unwrap();
        assert!(matches!(
            state.set_game_mode(GameMode::Creative),
            Err(ColonyError::InvalidState { .. })
        ));
        assert_eq!(state.mode(), GameMode::Survival);
    }

    #[test]
    fn reserved_population_moves_into_population() {
        let mut state = colony();
        state.reserve_population();
        assert_eq!(state.sync_payload().reserved_population, 1);
        state.materialize_reserved();
        assert_eq!(state.reserved_population(), 0);
        assert_eq!(state.population(), 1);
        state.materialize_reserved();
        assert_eq!(state.reserved_population(), 0);
    }

    #[test]
    fn persistence_round_trip() {
        let mut state = colony();
        let mut world = FlatWorld::new(64, 3);
        let player = state.owner();
        state
            .setup_center(Some(Position::new(-40, 70, 12)), &mut world, player)
            .unwrap();
        state.set_game_mode(GameMode::Creative).unwrap();
        for _ in 0..7 {
            state.add_population();
        }

        let record = state.serialize();
        let mut restored = colony();
        restored.deserialize(&record);

        assert_eq!(restored.population(), 7);
        assert_eq!(restored.center(), Some(Position::new(-40, 70, 12)));
        assert_eq!(restored.mode(), GameMode::Creative);
        assert!(restored.needs_sync());
    }

    #[test]
    fn origin_center_round_trips_to_unset() {
        let mut state = colony();
        let mut world = FlatWorld::new(0, 3);
        let player = state.owner();
        state
            .setup_center(Some(Position::ORIGIN), &mut world, player)
            .unwrap();
        let mut restored = colony();
        restored.deserialize(&state.serialize());
        assert!(restored.center().is_none());
    }

    #[test]
    fn deserialize_always_schedules_sync() {
        let mut state = colony();
        state.deserialize(&Record::new());
        assert!(state.needs_sync());
        assert_eq!(state.population(), 0);
        assert_eq!(state.mode(), GameMode::Unset);
    }
}
