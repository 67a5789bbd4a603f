//! Client-only interaction state: agent selection and combat box selection.

use colony_types::{AgentRef, Vec3};

/// An agent the camera follows, with the camera-to-agent offset captured at
/// the moment of selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSelection {
    /// The followed agent.
    pub agent: AgentRef,
    /// `agent position - camera position` at selection time.
    pub offset: Vec3,
}

impl AgentSelection {
    /// Camera position that keeps the original framing of the agent.
    pub fn camera_for(&self, agent_position: Vec3) -> Vec3 {
        agent_position.subtract(self.offset)
    }
}

/// A completed or in-progress combat selection box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBox {
    /// Screen point where the gesture started.
    pub screen_start: (f64, f64),
    /// Screen point where the gesture currently ends.
    pub screen_end: (f64, f64),
    /// World point under the start.
    pub world_start: Vec3,
    /// World point under the end.
    pub world_end: Vec3,
}

/// Box-selection gesture used while in combat mode.
#[derive(Debug, Clone, Default)]
pub struct CombatSelection {
    active: Option<SelectionBox>,
    last: Option<SelectionBox>,
}

impl CombatSelection {
    /// Begin a gesture at a screen point over a world point.
    pub fn start_selection(&mut self, screen: (f64, f64), world: Vec3) {
        self.active = Some(SelectionBox {
            screen_start: screen,
            screen_end: screen,
            world_start: world,
            world_end: world,
        });
    }

    /// Move the end of the active gesture. Ignored when none is active.
    pub fn update_selection(&mut self, screen: (f64, f64), world: Vec3) {
        if let Some(active) = self.active.as_mut() {
            active.screen_end = screen;
            active.world_end = world;
        }
    }

    /// Finish the active gesture, returning the selected box.
    pub fn end_selection(&mut self) -> Option<SelectionBox> {
        let finished = self.active.take();
        if finished.is_some() {
            self.last = finished;
        }
        finished
    }

    /// Whether a gesture is in progress.
    pub const fn is_selecting(&self) -> bool {
        self.active.is_some()
    }

    /// The most recently completed selection.
    pub const fn last_selection(&self) -> Option<&SelectionBox> {
        self.last.as_ref()
    }

    /// Select exactly the point under a single click.
    pub fn select_point(&mut self, screen: (f64, f64), world: Vec3) -> Option<SelectionBox> {
        self.start_selection(screen, world);
        self.update_selection(screen, world);
        self.end_selection()
    }
}
