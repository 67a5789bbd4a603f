//! Server-side colony session: the explicit handle to one player's colony.
//!
//! Code that needs colony state is given a [`ColonySession`] (or one of its
//! parts) by whoever owns the player's connection. There is no global
//! lookup. The session ties together the authoritative colony record, its
//! automation areas and the profession hooks, dispatches serverbound
//! requests, and persists everything as one record.

use colony_types::{PlayerId, Record, ServerboundMessage};
use colony_world::WorldOracle;
use tracing::{debug, info, warn};

use crate::areas::{AreaRegistry, AreasTick};
use crate::config::ColonyConfig;
use crate::error::ColonyError;
use crate::professions::{self, ProfessionHooks, ProfessionRoster};
use crate::server::ColonyServerState;
use crate::transport::ServerTransport;

/// What one session tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionTick {
    /// Whether a colony sync was sent.
    pub colony_synced: bool,
    /// What the area registry did.
    pub areas: AreasTick,
}

/// One player's colony on the server.
#[derive(Debug)]
pub struct ColonySession<P = ProfessionRoster> {
    player: PlayerId,
    colony: ColonyServerState,
    areas: AreaRegistry,
    professions: P,
}

impl ColonySession<ProfessionRoster> {
    /// Start a session with a [`ProfessionRoster`] built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::InvalidArgument`] if `player` is the nil id.
    pub fn with_roster(player: PlayerId, config: &ColonyConfig) -> Result<Self, ColonyError> {
        let roster = ProfessionRoster::new(config.professions.hireable.iter().cloned());
        Self::new(player, config, roster)
    }
}

impl<P: ProfessionHooks> ColonySession<P> {
    /// Start a session for `player`.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::InvalidArgument`] if `player` is the nil id.
    pub fn new(player: PlayerId, config: &ColonyConfig, professions: P) -> Result<Self, ColonyError> {
        let colony = ColonyServerState::new(player, config.colony.clone())?;
        info!(player = %player, "colony session started");
        Ok(Self {
            player,
            colony,
            areas: AreaRegistry::new(config.areas.refresh_interval_ticks),
            professions,
        })
    }

    /// Player owning this session.
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Authoritative colony state.
    pub const fn colony(&self) -> &ColonyServerState {
        &self.colony
    }

    /// Mutable colony state.
    pub const fn colony_mut(&mut self) -> &mut ColonyServerState {
        &mut self.colony
    }

    /// Automation areas.
    pub const fn areas(&self) -> &AreaRegistry {
        &self.areas
    }

    /// Mutable automation areas.
    pub const fn areas_mut(&mut self) -> &mut AreaRegistry {
        &mut self.areas
    }

    /// Profession hooks.
    pub const fn professions(&self) -> &P {
        &self.professions
    }

    /// A client (re)joined: announce the full colony and area state on the
    /// next tick.
    pub const fn connect(&mut self) {
        self.colony.schedule_sync();
        self.areas.schedule_sync();
    }

    /// Apply one request from the client.
    ///
    /// # Errors
    ///
    /// Propagates [`ColonyError`] from the colony operation the request maps
    /// to (e.g. [`ColonyError::InvalidState`] for a second center).
    pub fn handle(
        &mut self,
        message: ServerboundMessage,
        world: &mut dyn WorldOracle,
    ) -> Result<(), ColonyError> {
        debug!(player = %self.player, channel = message.channel(), "request received");
        match message {
            ServerboundMessage::SetCenter { position } => {
                let founders = self.colony.setup_center(Some(position), world, self.player)?;
                for _ in &founders {
                    self.colony.add_population();
                }
            }
            ServerboundMessage::SetGameMode { mode } => self.colony.set_game_mode(mode)?,
            ServerboundMessage::HirePawn { profession } => {
                if self.professions.send_hire_request(&profession) {
                    self.colony.reserve_population();
                }
            }
            ServerboundMessage::ChangeProfessionState { profession, change } => {
                professions::apply_change(&mut self.professions, &profession, change, self.player);
            }
        }
        Ok(())
    }

    /// Apply a batch of requests in order. A failing request is logged and
    /// does not stop the ones after it. Returns how many failed.
    pub fn handle_all<I>(&mut self, messages: I, world: &mut dyn WorldOracle) -> usize
    where
        I: IntoIterator<Item = ServerboundMessage>,
    {
        let mut failed = 0_usize;
        for message in messages {
            let channel = message.channel();
            if let Err(e) = self.handle(message, world) {
                warn!(player = %self.player, channel, error = %e, "request rejected");
                failed = failed.saturating_add(1);
            }
        }
        failed
    }

    /// Advance colony and areas by one tick, sending whatever syncs are due.
    pub fn tick(&mut self, world: &dyn WorldOracle, transport: &mut dyn ServerTransport) -> SessionTick {
        let colony_synced = self.colony.tick(self.player, transport);
        let areas = self.areas.tick(Some(self.player), world, transport);
        SessionTick {
            colony_synced,
            areas,
        }
    }

    /// Persist colony and areas into one record.
    pub fn serialize(&self) -> Record {
        let mut record = Record::new();
        self.colony.write(&mut record);
        self.areas.write(&mut record);
        record
    }

    /// Restore colony and areas from `record`; both re-announce themselves
    /// on the next tick.
    pub fn deserialize(&mut self, record: &Record) {
        self.colony.deserialize(record);
        self.areas.read(record);
        info!(
            player = %self.player,
            population = self.colony.population(),
            areas = self.areas.len(),
            "colony session restored"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{
        AreaId, AreaInfo, AreaKind, CHANNEL_AREAS_SYNC, CHANNEL_COLONY_SYNC, GameMode, Position,
        ProfessionChange,
    };
    use colony_world::FlatWorld;

    use super::*;
    use crate::transport::ServerOutbox;

    fn session() -> ColonySession {
        ColonySession::with_roster(PlayerId::new(), &ColonyConfig::default()).unwrap()
    }

    #[test]
    fn set_center_request_spawns_colonists_for_the_player() {
        let mut session = session();
        let mut world = FlatWorld::new(64, 9);
        session
            .handle(
                ServerboundMessage::SetCenter {
                    position: Position::new(5, 64, 5),
                },
                &mut world,
            )
            .unwrap();
        assert_eq!(world.agents_owned_by(session.player()).len(), 5);
        assert_eq!(session.colony().center(), Some(Position::new(5, 64, 5)));
        assert_eq!(session.colony().population(), 5);
    }

    #[test]
    fn batch_keeps_going_after_a_rejected_request() {
        let mut session = session();
        let mut world = FlatWorld::new(64, 9);
        let failed = session.handle_all(
            [
                ServerboundMessage::SetGameMode {
                    mode: GameMode::Unset,
                },
                ServerboundMessage::SetGameMode {
                    mode: GameMode::Survival,
                },
                ServerboundMessage::SetGameMode {
                    mode: GameMode::Creative,
                },
            ],
            &mut world,
        );
        assert_eq!(failed, 2);
        assert_eq!(session.colony().mode(), GameMode::Survival);
    }

    #[test]
    fn accepted_hire_reserves_population() {
        let mut session = session();
        let mut world = FlatWorld::new(64, 9);
        let hire = || ServerboundMessage::HirePawn {
            profession: String::from("miner1"),
        };
        session.handle(hire(), &mut world).unwrap();
        assert_eq!(session.colony().reserved_population(), 0);

        session
            .handle(
                ServerboundMessage::ChangeProfessionState {
                    profession: String::from("miner1"),
                    change: ProfessionChange::Add,
                },
                &mut world,
            )
            .unwrap();
        session.handle(hire(), &mut world).unwrap();
        assert_eq!(session.colony().reserved_population(), 1);
        assert_eq!(session.professions().hired().len(), 1);
    }

    #[test]
    fn tick_sends_each_dirty_part_once() {
        let mut session = session();
        let world = FlatWorld::new(64, 9);
        let mut outbox = ServerOutbox::new();
        session.colony_mut().add_population();
        session
            .areas_mut()
            .add_area(AreaInfo {
                id: AreaId::new(),
                kind: AreaKind::Farming,
                start: Position::ORIGIN,
                end: Position::new(3, 3, 3),
            })
            .unwrap();

        let outcome = session.tick(&world, &mut outbox);
        assert!(outcome.colony_synced);
        assert!(outcome.areas.synced);
        let again = session.tick(&world, &mut outbox);
        assert_eq!(again, SessionTick::default());
        assert_eq!(outbox.count_on(CHANNEL_COLONY_SYNC), 1);
        assert_eq!(outbox.count_on(CHANNEL_AREAS_SYNC), 1);
    }

    #[test]
    fn connect_announces_state_even_when_clean() {
        let mut session = session();
        let world = FlatWorld::new(64, 9);
        let mut outbox = ServerOutbox::new();
        assert_eq!(session.tick(&world, &mut outbox), SessionTick::default());
        session.connect();
        let outcome = session.tick(&world, &mut outbox);
        assert!(outcome.colony_synced);
        assert!(outcome.areas.synced);
    }

    #[test]
    fn session_record_round_trip() {
        let mut session = session();
        let mut world = FlatWorld::new(64, 9);
        session
            .handle(
                ServerboundMessage::SetCenter {
                    position: Position::new(-8, 64, 100),
                },
                &mut world,
            )
            .unwrap();
        session.colony_mut().add_population();
        let id = AreaId::new();
        session
            .areas_mut()
            .add_area(AreaInfo {
                id,
                kind: AreaKind::Mining,
                start: Position::new(0, 60, 0),
                end: Position::new(4, 64, 4),
            })
            .unwrap();

        let text = session.serialize().to_json();
        let mut restored = ColonySession::with_roster(session.player(), &ColonyConfig::default()).unwrap();
        restored.deserialize(&Record::from_json(&text).unwrap());

        assert_eq!(restored.colony().population(), 6);
        assert_eq!(restored.colony().center(), Some(Position::new(-8, 64, 100)));
        assert!(restored.areas().get(id).is_some());
        assert!(restored.colony().needs_sync());
        assert!(restored.areas().needs_sync());
    }
}
