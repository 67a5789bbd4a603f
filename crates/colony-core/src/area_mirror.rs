//! Client-side mirror of the server's automation areas.

use colony_types::{AreaId, AreaInfo, Position};

/// Area snapshots as last received from the server.
#[derive(Debug, Clone, Default)]
pub struct AreaMirror {
    areas: Vec<AreaInfo>,
    needs_rebuild: bool,
}

impl AreaMirror {
    /// Create an empty mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite all snapshots. The overlay must be rebuilt afterwards.
    pub fn replace(&mut self, areas: Vec<AreaInfo>) {
        self.areas = areas;
        self.needs_rebuild = true;
    }

    /// All snapshots, in server order.
    pub fn areas(&self) -> &[AreaInfo] {
        &self.areas
    }

    /// Look up a snapshot by id.
    pub fn get(&self, id: AreaId) -> Option<&AreaInfo> {
        self.areas.iter().find(|a| a.id == id)
    }

    /// First area containing `position`.
    pub fn area_at(&self, position: Position) -> Option<&AreaInfo> {
        self.areas.iter().find(|a| a.contains(position))
    }

    /// Flag the area overlay for rebuild.
    pub const fn set_needs_rebuild(&mut self, needs_rebuild: bool) {
        self.needs_rebuild = needs_rebuild;
    }

    /// Consume the rebuild flag.
    pub const fn take_rebuild(&mut self) -> bool {
        let needed = self.needs_rebuild;
        self.needs_rebuild = false;
        needed
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.areas.clear();
        self.needs_rebuild = true;
    }
}

#[cfg(test)]
mod tests {
    use colony_types::AreaKind;

    use super::*;

    #[test]
    fn replace_overwrites_and_flags_rebuild() {
        let mut mirror = AreaMirror::new();
        let info = AreaInfo {
            id: AreaId::new(),
            kind: AreaKind::Logging,
            start: Position::ORIGIN,
            end: Position::new(2, 2, 2),
        };
        mirror.replace(vec![info.clone()]);
        mirror.replace(vec![info.clone()]);
        assert_eq!(mirror.areas().len(), 1);
        assert!(mirror.take_rebuild());
        assert!(!mirror.take_rebuild());
        assert_eq!(mirror.area_at(Position::new(1, 1, 1)).map(|a| a.id), Some(info.id));
        assert!(mirror.area_at(Position::new(3, 1, 1)).is_none());
    }
}
