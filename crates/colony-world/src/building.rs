//! Finished buildings as the client sees them.

use colony_types::{BuildingId, Position};
use serde::{Deserialize, Serialize};

/// Essential facts about a finished building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingInfo {
    /// Building id.
    pub id: BuildingId,
    /// Requirement id the building's blueprint fulfils (e.g. `farm_wheat`).
    pub requirement_id: String,
    /// One corner of the building.
    pub start: Position,
    /// Opposite corner of the building.
    pub end: Position,
    /// Number of beds inside.
    pub beds: u32,
}

impl BuildingInfo {
    /// Whether `position` lies inside the building (inclusive).
    pub fn contains(&self, position: Position) -> bool {
        position.is_between(self.start, self.end)
    }

    /// Every cell the building occupies.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        Position::iterate_box(self.start, self.end)
    }
}
