//! Immutable description of an automation area.

use serde::{Deserialize, Serialize};

use crate::enums::AreaKind;
use crate::ids::AreaId;
use crate::position::Position;

/// What a client is allowed to see of an automation area.
///
/// The server wraps this in its own refreshable area type; the client only
/// ever holds these snapshots, delivered by the areas sync message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaInfo {
    /// Unique area id.
    pub id: AreaId,
    /// Kind used to match requirement queries.
    pub kind: AreaKind,
    /// One corner of the area.
    pub start: Position,
    /// The opposite corner of the area.
    pub end: Position,
}

impl AreaInfo {
    /// Whether `position` lies inside this area's box.
    pub fn contains(&self, position: Position) -> bool {
        position.is_between(self.start, self.end)
    }
}
