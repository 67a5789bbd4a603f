//! Client-side colony mirror and prediction state.
//!
//! Authoritative fields (population, center, mode, capacity) only change
//! through [`ColonyClientState::sync`]. Everything else here is local
//! prediction: the candidate center shown while none is set, the interaction
//! mode, the followed agent and the hovered building. The client asks the
//! server for changes and waits for the echo in the next sync, except for the
//! center, which it commits locally right away so the prompt can close.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;

use colony_types::{
    AgentRef, ClientboundMessage, ColonySync, GameMode, InteractionMode, Position, ServerboundMessage, Vec3,
};
use colony_world::{AgentSnapshot, Border, BuildingInfo, WorldOracle, compute_border};
use tracing::{debug, info};

use crate::area_mirror::AreaMirror;
use crate::config::ClientConfig;
use crate::error::ColonyError;
use crate::interaction::{AgentSelection, CombatSelection, SelectionBox};
use crate::presentation::{PLACE_CENTER_PROMPT, Presentation, PromptSlot, RebuildTarget};
use crate::requirements;
use crate::transport::ClientTransport;

/// What the host reports about the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientContext {
    /// Whether the player is in the colony-management view.
    pub in_colony_mode: bool,
    /// Block under the cursor, if any.
    pub hovered: Option<Position>,
}

/// Client mirror of one colony.
#[derive(Debug)]
pub struct ColonyClientState {
    initialized: bool,
    connected: bool,
    center: Option<Position>,
    population: i32,
    reserved_population: i32,
    max_population: i32,
    mode: GameMode,

    interaction: InteractionMode,
    prompt: Arc<PromptSlot>,
    candidate_center: Option<Position>,
    last_hovered: Option<Position>,
    rendered_candidate: Option<Position>,
    selection: Option<AgentSelection>,
    combat: CombatSelection,
    hovered_building: Option<BuildingInfo>,
    buildings: Vec<BuildingInfo>,
    special_blocks: BTreeMap<String, Vec<Position>>,
    blueprint_special_blocks: BTreeMap<String, Vec<Position>>,
    areas: AreaMirror,

    config: ClientConfig,
    border_size: NonZeroU32,
}

impl ColonyClientState {
    /// Create an uninitialized mirror.
    pub fn new(config: ClientConfig, border_size: NonZeroU32) -> Self {
        Self {
            initialized: false,
            connected: false,
            center: None,
            population: 0,
            reserved_population: 0,
            max_population: 0,
            mode: GameMode::Unset,
            interaction: InteractionMode::default(),
            prompt: Arc::new(PromptSlot::new()),
            candidate_center: None,
            last_hovered: None,
            rendered_candidate: None,
            selection: None,
            combat: CombatSelection::default(),
            hovered_building: None,
            buildings: Vec::new(),
            special_blocks: BTreeMap::new(),
            blueprint_special_blocks: BTreeMap::new(),
            areas: AreaMirror::new(),
            config,
            border_size,
        }
    }

    // -- Reconciliation ---------------------------------------------------

    /// Overwrite every mirrored field at once and mark the mirror initialized.
    pub fn sync(
        &mut self,
        population: i32,
        center: Option<Position>,
        mode: GameMode,
        connected: bool,
        max_population: i32,
        reserved_population: i32,
    ) {
        self.population = population;
        self.center = center;
        self.mode = mode;
        self.connected = connected;
        self.max_population = max_population;
        self.reserved_population = reserved_population;
        self.initialized = true;
        if center.is_some() {
            self.candidate_center = None;
        }
    }

    /// Apply a sync payload as received from the server.
    pub fn apply_sync(&mut self, payload: &ColonySync) {
        self.sync(
            payload.population,
            payload.center,
            payload.mode,
            payload.connected,
            payload.max_population,
            payload.reserved_population,
        );
    }

    /// Dispatch any clientbound message.
    pub fn apply(&mut self, message: &ClientboundMessage) {
        match message {
            ClientboundMessage::SyncColony(payload) => self.apply_sync(payload),
            ClientboundMessage::SyncAreas { areas } => {
                debug!(areas = areas.len(), "area snapshots received");
                self.areas.replace(areas.clone());
            }
        }
    }

    /// Run one client frame.
    pub fn tick(&mut self, context: ClientContext, world: &dyn WorldOracle, presentation: &dyn Presentation) {
        if let Some(selection) = self.selection {
            let alive = world.agent(selection.agent).is_some_and(|a| a.alive);
            if !alive {
                debug!(agent = %selection.agent, "followed agent gone, deselecting");
                self.deselect();
            }
        }

        if !context.in_colony_mode {
            self.prompt.hide(presentation);
            self.candidate_center = None;
            self.last_hovered = None;
            return;
        }

        if !self.initialized {
            return;
        }

        if self.center.is_none() && self.mode != GameMode::Unset {
            self.prompt.show_once(presentation, PLACE_CENTER_PROMPT);
            self.predict_center(context.hovered, world);
        }
    }

    fn predict_center(&mut self, hovered: Option<Position>, world: &dyn WorldOracle) {
        let Some(hovered) = hovered.filter(|p| *p != Position::ORIGIN) else {
            return;
        };
        if self.last_hovered == Some(hovered) {
            return;
        }
        self.last_hovered = Some(hovered);

        let mut steps = self.config.max_scan_height;
        let mut candidate = hovered;
        while !world.can_place_structure_at(candidate) {
            if steps == 0 {
                return;
            }
            steps = steps.saturating_sub(1);
            candidate = candidate.up();
        }
        while steps > 0 && world.can_place_structure_at(candidate.down()) {
            steps = steps.saturating_sub(1);
            candidate = candidate.down();
        }
        self.candidate_center = Some(candidate);
    }

    /// Commit the candidate center and ask the server to set it.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::InvalidState`] if the center is already set or
    /// no candidate has been predicted yet.
    pub fn confirm_center(
        &mut self,
        transport: &mut dyn ClientTransport,
        presentation: &dyn Presentation,
    ) -> Result<Position, ColonyError> {
        if self.center.is_some() {
            return Err(ColonyError::invalid_state("colony center is already set"));
        }
        let Some(position) = self.candidate_center.take() else {
            return Err(ColonyError::invalid_state("no candidate center to confirm"));
        };

        self.prompt.hide(presentation);
        self.center = Some(position);
        self.last_hovered = None;
        transport.deliver(ServerboundMessage::SetCenter { position });
        presentation.schedule_region_render(position, position);
        presentation.schedule_terrain_update();
        info!(center = %position, "colony center confirmed");
        Ok(position)
    }

    /// Ask the server to switch game mode.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::InvalidArgument`] for [`GameMode::Unset`].
    pub fn request_game_mode(&self, mode: GameMode, transport: &mut dyn ClientTransport) -> Result<(), ColonyError> {
        if mode == GameMode::Unset {
            return Err(ColonyError::invalid_argument("game mode cannot be set back to unset"));
        }
        transport.deliver(ServerboundMessage::SetGameMode { mode });
        Ok(())
    }

    /// Return to the uninitialized sentinel.
    pub fn reset(&mut self, presentation: &dyn Presentation) {
        self.prompt.hide(presentation);
        let config = self.config.clone();
        let border_size = self.border_size;
        let prompt = Arc::clone(&self.prompt);
        *self = Self::new(config, border_size);
        self.prompt = prompt;
    }

    // -- Agent selection --------------------------------------------------

    /// Select an agent to follow, or box-select around it in combat mode.
    ///
    /// Returns the combat selection box when the click was consumed as a
    /// gesture.
    pub fn select_agent(&mut self, agent: &AgentSnapshot, camera: Vec3, cursor: (f64, f64)) -> Option<SelectionBox> {
        if self.interaction == InteractionMode::Combat {
            self.deselect();
            return self.combat.select_point(cursor, agent.position);
        }
        self.selection = Some(AgentSelection {
            agent: agent.id,
            offset: agent.position.subtract(camera),
        });
        None
    }

    /// Stop following any agent.
    pub const fn deselect(&mut self) {
        self.selection = None;
    }

    /// Whether an agent is followed in build mode.
    pub fn is_selecting_agent(&self) -> bool {
        self.interaction == InteractionMode::Build && self.selection.is_some()
    }

    /// The followed agent.
    pub fn selected_agent(&self) -> Option<AgentRef> {
        self.selection.map(|s| s.agent)
    }

    /// Camera position that keeps the followed agent framed as at selection.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::InvalidState`] if no agent is followed in build
    /// mode or the selected agent no longer exists.
    pub fn compute_follow_camera_position(&self, world: &dyn WorldOracle) -> Result<Vec3, ColonyError> {
        let selection = self
            .selection
            .filter(|_| self.is_selecting_agent())
            .ok_or_else(|| ColonyError::invalid_state("no agent followed in build mode"))?;
        let agent = world
            .agent(selection.agent)
            .ok_or_else(|| ColonyError::invalid_state(format!("selected agent {} no longer exists", selection.agent)))?;
        Ok(selection.camera_for(agent.position))
    }

    /// Combat box-selection gesture.
    pub const fn combat_selection(&mut self) -> &mut CombatSelection {
        &mut self.combat
    }

    // -- Buildings and requirements ---------------------------------------

    /// Replace the cached building list.
    pub fn update_buildings(&mut self, buildings: Vec<BuildingInfo>) {
        self.buildings = buildings;
        self.hovered_building = None;
    }

    /// Cached buildings.
    pub fn buildings(&self) -> &[BuildingInfo] {
        &self.buildings
    }

    /// Find the building containing `position` and remember it as hovered.
    pub fn is_within_any_building(&mut self, position: Position) -> Option<&BuildingInfo> {
        self.hovered_building = self.buildings.iter().find(|b| b.contains(position)).cloned();
        self.hovered_building.as_ref()
    }

    /// Building last matched by [`Self::is_within_any_building`].
    pub const fn hovered_building(&self) -> Option<&BuildingInfo> {
        self.hovered_building.as_ref()
    }

    /// Every cell of the building containing `position`.
    pub fn building_selection(&mut self, position: Position) -> Vec<Position> {
        self.is_within_any_building(position)
            .map(|b| b.cells().collect())
            .unwrap_or_default()
    }

    /// See [`requirements::has_required_building`].
    pub fn has_required_building(&self, requirement_id: &str, min_count: u32) -> bool {
        requirements::has_required_building(&self.buildings, requirement_id, min_count)
    }

    /// See [`requirements::count_buildings`].
    pub fn count_buildings(&self, requirement_id: &str) -> usize {
        requirements::count_buildings(&self.buildings, requirement_id)
    }

    /// Replace the known special block positions, either placed or planned.
    pub fn set_special_blocks(&mut self, blocks: BTreeMap<String, Vec<Position>>, blueprint: bool) {
        if blueprint {
            self.blueprint_special_blocks = blocks;
        } else {
            self.special_blocks = blocks;
        }
    }

    /// Whether more than `min_count` blocks of `block` are known.
    pub fn has_required_block(&self, block: &str, blueprint: bool, min_count: u32) -> bool {
        let blocks = if blueprint {
            &self.blueprint_special_blocks
        } else {
            &self.special_blocks
        };
        requirements::has_required_block(blocks, block, min_count)
    }

    // -- Rendering and interaction mode -----------------------------------

    /// Border around the candidate center while unset, else around the center.
    pub fn colony_border(&self) -> Option<Border> {
        let point = if self.center.is_none() {
            self.candidate_center
        } else {
            self.center
        };
        compute_border(point, self.border_size)
    }

    /// Re-render around the candidate center if it moved since last call.
    pub fn update_renderer(&mut self, presentation: &dyn Presentation) -> bool {
        if self.candidate_center == self.rendered_candidate {
            return false;
        }
        let margin = self.config.render_margin;
        for point in [self.rendered_candidate, self.candidate_center].into_iter().flatten() {
            presentation.schedule_region_render(
                point.offset(-margin, -margin, -margin),
                point.offset(margin, margin, margin),
            );
        }
        presentation.schedule_terrain_update();
        self.rendered_candidate = self.candidate_center;
        true
    }

    /// Switch interaction mode and rebuild the overlay it shows.
    pub fn set_interaction_mode(&mut self, mode: InteractionMode, presentation: &dyn Presentation) {
        if mode == self.interaction {
            return;
        }
        self.interaction = mode;
        match mode {
            InteractionMode::AreasSelection => {
                self.areas.set_needs_rebuild(true);
                presentation.request_rebuild(RebuildTarget::Areas);
            }
            InteractionMode::Build => presentation.request_rebuild(RebuildTarget::Tasks),
            InteractionMode::Combat => {}
        }
        debug!(?mode, "interaction mode changed");
    }

    /// Current interaction mode.
    pub const fn interaction_mode(&self) -> InteractionMode {
        self.interaction
    }

    // -- Mirrored fields and predicates -----------------------------------

    /// Whether at least one sync has been applied.
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the server reports this mirror as live.
    pub const fn is_connected_to_server(&self) -> bool {
        self.initialized && self.connected
    }

    /// Whether the player should be placing the center now: synced, a game
    /// mode chosen, and no center yet.
    pub fn is_center_not_set(&self) -> bool {
        self.initialized && self.center.is_none() && self.mode != GameMode::Unset
    }

    /// Whether the player still has to pick a game mode. False until the
    /// first sync.
    pub fn game_mode_needs_initialization(&self) -> bool {
        self.initialized && self.mode == GameMode::Unset
    }

    /// Whether the colony plays in creative mode.
    pub fn is_creative(&self) -> bool {
        self.mode == GameMode::Creative
    }

    /// Whether the colony plays in survival mode.
    pub fn is_survival(&self) -> bool {
        self.mode == GameMode::Survival
    }

    /// Mirrored center.
    pub const fn center(&self) -> Option<Position> {
        self.center
    }

    /// Predicted center while none is set.
    pub const fn candidate_center(&self) -> Option<Position> {
        self.candidate_center
    }

    /// Mirrored population.
    pub const fn population(&self) -> i32 {
        self.population
    }

    /// Mirrored reserved population.
    pub const fn reserved_population(&self) -> i32 {
        self.reserved_population
    }

    /// Mirrored capacity.
    pub const fn max_population(&self) -> i32 {
        self.max_population
    }

    /// Mirrored game mode.
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// Area snapshots.
    pub const fn areas(&self) -> &AreaMirror {
        &self.areas
    }

    /// Mutable area snapshots, for the overlay to consume its rebuild flag.
    pub const fn areas_mut(&mut self) -> &mut AreaMirror {
        &mut self.areas
    }

    /// Shared handle to the prompt slot, for the render thread.
    pub fn prompt_slot(&self) -> Arc<PromptSlot> {
        Arc::clone(&self.prompt)
    }
}
