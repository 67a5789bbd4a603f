//! Scripted stand-in for a human player driving the client.
//!
//! Each frame the player looks at the client mirror and does the next
//! sensible thing: pick a game mode, hover over the ground near its spawn
//! point, confirm the center once a candidate shows up, then hire one
//! colonist. All requests go through the client transport and take effect
//! only when the server echoes them back.

use colony_core::{ClientContext, ClientTransport, ColonyClientState, Presentation};
use colony_types::{GameMode, Position, ProfessionChange, ServerboundMessage};
use colony_world::WorldOracle;
use tracing::{info, warn};

/// Frames to hover before confirming the center.
const HOVER_FRAMES: u32 = 3;

/// Deterministic player behavior.
#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    mode: GameMode,
    hover: Position,
    profession: String,
    mode_requested: bool,
    hovered_frames: u32,
    hired: bool,
}

impl ScriptedPlayer {
    /// A player that wants `mode`, looks at `hover`, and hires `profession`.
    pub fn new(mode: GameMode, hover: Position, profession: impl Into<String>) -> Self {
        Self {
            mode,
            hover,
            profession: profession.into(),
            mode_requested: false,
            hovered_frames: 0,
            hired: false,
        }
    }

    /// Play one client frame.
    pub fn frame(
        &mut self,
        client: &mut ColonyClientState,
        world: &dyn WorldOracle,
        presentation: &dyn Presentation,
        transport: &mut dyn ClientTransport,
    ) {
        if client.game_mode_needs_initialization() && !self.mode_requested {
            match client.request_game_mode(self.mode, transport) {
                Ok(()) => self.mode_requested = true,
                Err(e) => warn!(error = %e, "game mode request refused"),
            }
        }

        client.tick(
            ClientContext {
                in_colony_mode: true,
                hovered: Some(self.hover),
            },
            world,
            presentation,
        );
        client.update_renderer(presentation);

        if client.is_center_not_set() && client.candidate_center().is_some() {
            self.hovered_frames = self.hovered_frames.saturating_add(1);
            if self.hovered_frames >= HOVER_FRAMES {
                match client.confirm_center(transport, presentation) {
                    Ok(center) => info!(center = %center, "player placed the colony"),
                    Err(e) => warn!(error = %e, "center placement refused"),
                }
            }
            return;
        }

        if !self.hired && client.center().is_some() && client.population() > 0 {
            transport.deliver(ServerboundMessage::ChangeProfessionState {
                profession: self.profession.clone(),
                change: ProfessionChange::Add,
            });
            transport.deliver(ServerboundMessage::HirePawn {
                profession: self.profession.clone(),
            });
            self.hired = true;
        }
    }

    /// Whether the hire request has been sent.
    pub const fn has_hired(&self) -> bool {
        self.hired
    }
}
