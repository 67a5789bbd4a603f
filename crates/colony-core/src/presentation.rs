//! Presentation hooks consumed by the client mirror.
//!
//! Rendering, toasts and overlays are implemented elsewhere; the client only
//! calls these hooks. Hook methods take `&self` because the render path may
//! call into the same presenter from another thread.
//!
//! The "place your center" prompt is the one piece of client state touched by
//! both the tick path and the frame path, so its handle lives in a
//! [`PromptSlot`]: a lock around that single field and nothing else.

use std::sync::{Mutex, MutexGuard, PoisonError};

use colony_types::Position;

/// Handle to a prompt currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromptHandle(pub u64);

/// Text of an on-screen prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    /// Headline.
    pub title: &'static str,
    /// Secondary line.
    pub subtitle: &'static str,
}

/// Prompt shown while the colony has no center.
pub const PLACE_CENTER_PROMPT: Prompt = Prompt {
    title: "Set up your Colony",
    subtitle: "Right-click to place",
};

/// Overlays the client can ask to have rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebuildTarget {
    /// Saved automation area overlay.
    Areas,
    /// Pending task overlay.
    Tasks,
}

/// Hooks into the presentation layer.
pub trait Presentation {
    /// Put a prompt on screen and return its handle.
    fn show_prompt(&self, prompt: Prompt) -> PromptHandle;

    /// Take a prompt off screen.
    fn hide_prompt(&self, handle: PromptHandle);

    /// Re-render the box spanned by `start` and `end`.
    fn schedule_region_render(&self, start: Position, end: Position);

    /// Re-render terrain after block renders were scheduled.
    fn schedule_terrain_update(&self);

    /// Rebuild a cached overlay.
    fn request_rebuild(&self, target: RebuildTarget);
}

/// The pending-prompt handle, guarded by its own lock.
#[derive(Debug, Default)]
pub struct PromptSlot {
    handle: Mutex<Option<PromptHandle>>,
}

impl PromptSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<PromptHandle>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show `prompt` unless one is already shown. Returns whether a new
    /// prompt was put on screen.
    pub fn show_once(&self, presentation: &dyn Presentation, prompt: Prompt) -> bool {
        let mut slot = self.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(presentation.show_prompt(prompt));
        true
    }

    /// Hide the prompt if one is shown. Returns whether one was hidden.
    pub fn hide(&self, presentation: &dyn Presentation) -> bool {
        let mut slot = self.lock();
        match slot.take() {
            Some(handle) => {
                presentation.hide_prompt(handle);
                true
            }
            None => false,
        }
    }

    /// Whether a prompt is currently shown.
    pub fn is_shown(&self) -> bool {
        self.lock().is_some()
    }
}

/// A presentation call captured by [`PresentationLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    /// A prompt was shown.
    PromptShown(PromptHandle, &'static str),
    /// A prompt was hidden.
    PromptHidden(PromptHandle),
    /// A region re-render was scheduled.
    RegionRender(Position, Position),
    /// A terrain update was scheduled.
    TerrainUpdate,
    /// An overlay rebuild was requested.
    Rebuild(RebuildTarget),
}

/// [`Presentation`] that records every call, for headless runs and tests.
#[derive(Debug, Default)]
pub struct PresentationLog {
    events: Mutex<Vec<PresentationEvent>>,
    next_handle: Mutex<u64>,
}

impl PresentationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: PresentationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<PresentationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&PresentationEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| predicate(e))
            .count()
    }
}

impl Presentation for PresentationLog {
    fn show_prompt(&self, prompt: Prompt) -> PromptHandle {
        let handle = {
            let mut next = self.next_handle.lock().unwrap_or_else(PoisonError::into_inner);
            *next = next.wrapping_add(1);
            PromptHandle(*next)
        };
        self.push(PresentationEvent::PromptShown(handle, prompt.title));
        handle
    }

    fn hide_prompt(&self, handle: PromptHandle) {
        self.push(PresentationEvent::PromptHidden(handle));
    }

    fn schedule_region_render(&self, start: Position, end: Position) {
        self.push(PresentationEvent::RegionRender(start, end));
    }

    fn schedule_terrain_update(&self) {
        self.push(PresentationEvent::TerrainUpdate);
    }

    fn request_rebuild(&self, target: RebuildTarget) {
        self.push(PresentationEvent::Rebuild(target));
    }
}
