//! Requirement-satisfaction queries over the client's cached buildings.
//!
//! Some building families count for more than one toward a requirement:
//!
//! | Requirement id | Contribution |
//! |---|---|
//! | starts with `miner`, `lumberjack` or `warrior` | beds x 10 |
//! | exactly `shooting_gallery` | buildings x 10 |
//! | starts with `farm` | buildings x 5 |
//! | anything else | buildings x 1 |
//!
//! A requirement is met when the contribution is strictly greater than the
//! minimum count.

use std::collections::BTreeMap;

use colony_types::Position;
use colony_world::BuildingInfo;

/// Requirement prefixes whose buildings count by beds.
const BED_FAMILIES: [&str; 3] = ["miner", "lumberjack", "warrior"];

/// Requirement counted at ten per building.
const SHOOTING_GALLERY: &str = "shooting_gallery";

/// Requirement prefix counted at five per building.
const FARM_FAMILY: &str = "farm";

/// Number of cached buildings with exactly this requirement id.
pub fn count_buildings(buildings: &[BuildingInfo], requirement_id: &str) -> usize {
    buildings
        .iter()
        .filter(|b| b.requirement_id == requirement_id)
        .count()
}

/// Weighted contribution of the buildings matching `requirement_id`.
pub fn requirement_weight(buildings: &[BuildingInfo], requirement_id: &str) -> u64 {
    let matching = buildings.iter().filter(|b| b.requirement_id == requirement_id);
    if BED_FAMILIES.iter().any(|family| requirement_id.starts_with(family)) {
        return matching
            .map(|b| u64::from(b.beds).saturating_mul(10))
            .fold(0, u64::saturating_add);
    }
    let count = u64::try_from(matching.count()).unwrap_or(u64::MAX);
    if requirement_id == SHOOTING_GALLERY {
        count.saturating_mul(10)
    } else if requirement_id.starts_with(FARM_FAMILY) {
        count.saturating_mul(5)
    } else {
        count
    }
}

/// Whether the weighted contribution exceeds `min_count`.
pub fn has_required_building(buildings: &[BuildingInfo], requirement_id: &str, min_count: u32) -> bool {
    requirement_weight(buildings, requirement_id) > u64::from(min_count)
}

/// Whether more than `min_count` blocks of `block` are known.
pub fn has_required_block(blocks: &BTreeMap<String, Vec<Position>>, block: &str, min_count: u32) -> bool {
    let known = blocks.get(block).map_or(0, Vec::len);
    u64::try_from(known).unwrap_or(u64::MAX) > u64::from(min_count)
}

#[cfg(test)]
mod tests {
    use colony_types::BuildingId;

    use super::*;

    fn building(requirement_id: &str, beds: u32) -> BuildingInfo {
        BuildingInfo {
            id: BuildingId::new(),
            requirement_id: requirement_id.to_owned(),
            start: Position::ORIGIN,
            end: Position::new(4, 4, 4),
            beds,
        }
    }

    #[test]
    fn bed_families_count_beds_times_ten() {
        let buildings = vec![building("miner_house", 2), building("miner_house", 1)];
        assert_eq!(requirement_weight(&buildings, "miner_house"), 30);
        assert!(has_required_building(&buildings, "miner_house", 29));
        assert!(!has_required_building(&buildings, "miner_house", 30));
        assert_eq!(requirement_weight(&[building("warrior_camp", 0)], "warrior_camp"), 0);
    }

    #[test]
    fn shooting_gallery_counts_ten_per_building() {
        let buildings = vec![building("shooting_gallery", 0)];
        assert_eq!(requirement_weight(&buildings, "shooting_gallery"), 10);
        assert!(has_required_building(&buildings, "shooting_gallery", 9));
    }

    #[test]
    fn farms_count_five_per_building() {
        let buildings = vec![building("farm_wheat", 0), building("farm_wheat", 3)];
        assert_eq!(requirement_weight(&buildings, "farm_wheat"), 10);
    }

    #[test]
    fn other_buildings_count_once() {
        let buildings = vec![building("bakery", 4), building("bakery", 4), building("forge", 0)];
        assert_eq!(requirement_weight(&buildings, "bakery"), 2);
        assert!(has_required_building(&buildings, "bakery", 1));
        assert!(!has_required_building(&buildings, "bakery", 2));
        assert_eq!(count_buildings(&buildings, "forge"), 1);
        assert!(!has_required_building(&buildings, "tavern", 0));
    }

    #[test]
    fn required_block_is_strictly_greater() {
        let mut blocks = BTreeMap::new();
        blocks.insert(String::from("crafting_table"), vec![Position::ORIGIN]);
        assert!(has_required_block(&blocks, "crafting_table", 0));
        assert!(!has_required_block(&blocks, "crafting_table", 1));
        assert!(!has_required_block(&blocks, "furnace", 0));
    }
}
