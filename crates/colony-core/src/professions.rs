//! Profession hooks triggered by serverbound requests.
//!
//! The profession business rules live outside the colony core. The core only
//! routes requests to a [`ProfessionHooks`] implementation and reflects
//! accepted hires in the colony's reserved population. [`ProfessionRoster`]
//! is a minimal counting implementation.

use std::collections::{BTreeMap, BTreeSet};

use colony_types::{PlayerId, ProfessionChange};
use tracing::debug;

/// Hooks into the profession subsystem.
pub trait ProfessionHooks {
    /// Whether `profession` is hired through a hire screen.
    fn is_hireable(&self, profession: &str) -> bool;

    /// Open the hire screen for `profession` on behalf of `player`.
    fn open_hire_menu(&mut self, profession: &str, player: PlayerId);

    /// Forward a hire request to the currently open hire screen. Returns
    /// whether the hire was accepted.
    fn send_hire_request(&mut self, profession: &str) -> bool;

    /// Assign one more colonist to `profession`.
    fn increase(&mut self, profession: &str);

    /// Take one colonist off `profession`.
    fn decrease(&mut self, profession: &str);
}

/// Route a headcount change: adding to a hireable profession opens its hire
/// screen instead of assigning directly.
pub fn apply_change(
    hooks: &mut dyn ProfessionHooks,
    profession: &str,
    change: ProfessionChange,
    player: PlayerId,
) {
    match change {
        ProfessionChange::Add if hooks.is_hireable(profession) => {
            hooks.open_hire_menu(profession, player);
        }
        ProfessionChange::Add => hooks.increase(profession),
        ProfessionChange::Remove => hooks.decrease(profession),
    }
}

/// Counting [`ProfessionHooks`] implementation.
#[derive(Debug, Clone, Default)]
pub struct ProfessionRoster {
    hireable: BTreeSet<String>,
    counts: BTreeMap<String, u32>,
    open_menu: Option<String>,
    hired: Vec<String>,
}

impl ProfessionRoster {
    /// Create a roster where `hireable` professions go through a hire screen.
    pub fn new<I, S>(hireable: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hireable: hireable.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Colonists currently assigned to `profession`.
    pub fn count(&self, profession: &str) -> u32 {
        self.counts.get(profession).copied().unwrap_or(0)
    }

    /// Profession whose hire screen is open.
    pub fn open_menu(&self) -> Option<&str> {
        self.open_menu.as_deref()
    }

    /// Accepted hires, oldest first.
    pub fn hired(&self) -> &[String] {
        &self.hired
    }
}

impl ProfessionHooks for ProfessionRoster {
    fn is_hireable(&self, profession: &str) -> bool {
        self.hireable.contains(profession)
    }

    fn open_hire_menu(&mut self, profession: &str, player: PlayerId) {
        debug!(profession, player = %player, "hire menu opened");
        self.open_menu = Some(profession.to_owned());
    }

    fn send_hire_request(&mut self, profession: &str) -> bool {
        if self.open_menu.as_deref() != Some(profession) {
            debug!(profession, "hire request without matching menu ignored");
            return false;
        }
        self.hired.push(profession.to_owned());
        true
    }

    fn increase(&mut self, profession: &str) {
        let count = self.counts.entry(profession.to_owned()).or_insert(0);
        *count = count.saturating_add(1);
    }

    fn decrease(&mut self, profession: &str) {
        if let Some(count) = self.counts.get_mut(profession) {
            *count = count.saturating_sub(1);
        }
    }
}
