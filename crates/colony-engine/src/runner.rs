//! The engine loop: one server session and one client mirror talking over
//! in-process channels, ticked at a fixed interval.
//!
//! Each tick runs the server half first (handle queued requests, then send
//! due syncs) and the client half second (apply syncs, then let the player
//! act). Requests sent by the player are therefore handled on the next tick,
//! and their effects reach the client on that same tick.

use colony_core::{ColonyClientState, ColonyConfig, ColonySession, PresentationLog};
use colony_types::{AreaId, AreaInfo, AreaKind, ClientboundMessage, GameMode, PlayerId, Position, Record, ServerboundMessage};
use colony_world::FlatWorld;
use tracing::{debug, info};

use crate::channel::{self, ChannelClientTransport, ChannelServerTransport, FrameReceiver};
use crate::error::EngineError;
use crate::player::ScriptedPlayer;

/// Half-width of the automation areas seeded around a new center.
const SEED_AREA_RADIUS: i32 = 3;

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed.
    pub total_ticks: u64,
    /// Colony syncs sent.
    pub colony_syncs: u64,
    /// Area snapshot syncs sent.
    pub area_syncs: u64,
    /// Area refreshes performed.
    pub area_refreshes: u64,
    /// Requests the server rejected.
    pub rejected_requests: u64,
    /// Population as last seen by the client.
    pub client_population: i32,
    /// Center as last seen by the client.
    pub client_center: Option<Position>,
}

/// Everything one colony needs to run.
#[derive(Debug)]
pub struct ColonyEngine {
    session: ColonySession,
    client: ColonyClientState,
    player: ScriptedPlayer,
    world: FlatWorld,
    presentation: PresentationLog,
    to_client: ChannelServerTransport,
    client_inbox: FrameReceiver,
    to_server: ChannelClientTransport,
    server_inbox: FrameReceiver,
}

impl ColonyEngine {
    /// Build an engine for a fresh player, restoring `save` if given.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Colony`] if the session cannot be created.
    pub fn new(config: &ColonyConfig, save: Option<&Record>) -> Result<Self, EngineError> {
        let player_id = PlayerId::new();
        let mut session = ColonySession::with_roster(player_id, config)?;
        if let Some(record) = save {
            session.deserialize(record);
        }
        session.connect();

        let mut world = FlatWorld::new(config.engine.ground_level, config.engine.seed);
        world.register_agent_kind(&config.colony.colonist_kind);

        let (to_client, client_inbox) = channel::clientbound();
        let (to_server, server_inbox) = channel::serverbound();
        let hover = Position::new(8, config.engine.ground_level.saturating_add(12), 8);
        let profession = config
            .professions
            .hireable
            .first()
            .cloned()
            .unwrap_or_else(|| String::from("warrior1"));

        Ok(Self {
            session,
            client: ColonyClientState::new(config.client.clone(), config.colony.border_size),
            player: ScriptedPlayer::new(GameMode::Survival, hover, profession),
            world,
            presentation: PresentationLog::new(),
            to_client,
            client_inbox,
            to_server,
            server_inbox,
        })
    }

    /// Run one tick of both halves.
    pub fn step(&mut self, summary: &mut RunSummary) {
        let requests: Vec<ServerboundMessage> = self.server_inbox.drain();
        let rejected = self.session.handle_all(requests, &mut self.world);
        summary.rejected_requests = summary
            .rejected_requests
            .saturating_add(u64::try_from(rejected).unwrap_or(u64::MAX));
        self.seed_areas();

        let outcome = self.session.tick(&self.world, &mut self.to_client);
        if outcome.colony_synced {
            summary.colony_syncs = summary.colony_syncs.saturating_add(1);
        }
        if outcome.areas.synced {
            summary.area_syncs = summary.area_syncs.saturating_add(1);
        }
        if outcome.areas.refreshed.is_some() {
            summary.area_refreshes = summary.area_refreshes.saturating_add(1);
        }

        let updates: Vec<ClientboundMessage> = self.client_inbox.drain();
        for update in &updates {
            self.client.apply(update);
        }
        self.player
            .frame(&mut self.client, &self.world, &self.presentation, &mut self.to_server);

        summary.total_ticks = summary.total_ticks.saturating_add(1);
        summary.client_population = self.client.population();
        summary.client_center = self.client.center();
    }

    /// Give a freshly placed colony one area of each kind around its center.
    fn seed_areas(&mut self) {
        let Some(center) = self.session.colony().center() else {
            return;
        };
        if !self.session.areas().is_empty() {
            return;
        }
        for (offset, kind) in [(-8, AreaKind::Farming), (0, AreaKind::Mining), (8, AreaKind::Logging)] {
            let middle = center.offset(offset, 0, 8);
            let info = AreaInfo {
                id: AreaId::new(),
                kind,
                start: middle.offset(-SEED_AREA_RADIUS, -SEED_AREA_RADIUS, -SEED_AREA_RADIUS),
                end: middle.offset(SEED_AREA_RADIUS, SEED_AREA_RADIUS, SEED_AREA_RADIUS),
            };
            if let Err(e) = self.session.areas_mut().add_area(info) {
                debug!(error = %e, "seed area skipped");
            }
        }
    }

    /// The server session.
    pub const fn session(&self) -> &ColonySession {
        &self.session
    }

    /// The client mirror.
    pub const fn client(&self) -> &ColonyClientState {
        &self.client
    }

    /// The simulated world.
    pub const fn world(&self) -> &FlatWorld {
        &self.world
    }
}

/// Tick `engine` until `max_ticks`, sleeping `tick_interval_ms` between ticks.
pub async fn run(engine: &mut ColonyEngine, max_ticks: u64, tick_interval_ms: u64) -> RunSummary {
    let mut summary = RunSummary::default();
    info!(max_ticks, tick_interval_ms, "colony loop starting");

    while summary.total_ticks < max_ticks {
        engine.step(&mut summary);
        if tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(tick_interval_ms)).await;
        }
    }

    info!(
        total_ticks = summary.total_ticks,
        colony_syncs = summary.colony_syncs,
        area_syncs = summary.area_syncs,
        area_refreshes = summary.area_refreshes,
        rejected_requests = summary.rejected_requests,
        population = summary.client_population,
        "colony loop finished"
    );
    summary
}
