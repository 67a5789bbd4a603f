//! Server-side automation area registry.
//!
//! The registry owns every automation area of a colony. Each area carries
//! refresh state that is revalidated against the world over time: on every
//! scheduling quantum exactly one area is refreshed, chosen by a
//! [`RoundRobin`], so the per-tick cost stays bounded no matter how many
//! areas exist. Like the colony state, the registry only flips a dirty flag
//! when it changes and emits one full snapshot sync on the next tick.

use std::num::NonZeroU32;

use colony_types::{AreaId, AreaInfo, AreaKind, ClientboundMessage, PlayerId, Position, Record};
use colony_world::WorldOracle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ColonyError;
use crate::scheduler::RoundRobin;
use crate::transport::ServerTransport;

const KEY_MANAGER: &str = "areaManager";
const KEY_AREAS: &str = "areas";

/// Largest horizontal side of an area, in columns. A refresh scans every
/// column, so this bounds the cost of one quantum.
pub const MAX_AREA_SIDE: u32 = 128;

/// Describe why `info` is too large to refresh in one quantum, if it is.
fn oversized(info: &AreaInfo) -> Option<String> {
    let width = info.start.x.abs_diff(info.end.x).saturating_add(1);
    let depth = info.start.z.abs_diff(info.end.z).saturating_add(1);
    (width > MAX_AREA_SIDE || depth > MAX_AREA_SIDE)
        .then(|| format!("area {} spans {width}x{depth} columns, limit is {MAX_AREA_SIDE}", info.id))
}

// ---------------------------------------------------------------------------
// ServerArea
// ---------------------------------------------------------------------------

/// Refresh state of one area, revalidated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshState {
    /// Surface cell of every column inside the area, as of the last refresh.
    pub work_cells: Vec<Position>,
    /// How many times the area has been refreshed.
    pub refresh_count: u32,
    /// Registry tick of the last refresh.
    pub last_refreshed_tick: Option<u64>,
}

/// An automation area as owned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerArea {
    info: AreaInfo,
    state: RefreshState,
}

impl ServerArea {
    /// Wrap an area description with empty refresh state.
    pub fn new(info: AreaInfo) -> Self {
        Self {
            info,
            state: RefreshState::default(),
        }
    }

    /// Area id.
    pub const fn id(&self) -> AreaId {
        self.info.id
    }

    /// Area kind.
    pub const fn kind(&self) -> AreaKind {
        self.info.kind
    }

    /// Immutable snapshot for the client.
    pub fn info(&self) -> &AreaInfo {
        &self.info
    }

    /// Current refresh state.
    pub const fn state(&self) -> &RefreshState {
        &self.state
    }

    /// Re-scan the world for the area's work cells.
    pub fn refresh(&mut self, world: &dyn WorldOracle, tick: u64) {
        let floor = self.info.start.y.min(self.info.end.y);
        let ceiling = self.info.start.y.max(self.info.end.y).saturating_add(1);
        self.state.work_cells.clear();
        let corners = (
            Position::new(self.info.start.x, 0, self.info.start.z),
            Position::new(self.info.end.x, 0, self.info.end.z),
        );
        for column in Position::iterate_box(corners.0, corners.1) {
            let y = world.surface_height_at(column.x, column.z);
            if (floor..=ceiling).contains(&y) {
                self.state.work_cells.push(Position::new(column.x, y, column.z));
            }
        }
        self.state.refresh_count = self.state.refresh_count.saturating_add(1);
        self.state.last_refreshed_tick = Some(tick);
    }

    /// Teardown before removal.
    pub fn reset(&mut self) {
        self.state = RefreshState::default();
    }

    /// Encode the area description.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.put_string("id", &self.info.id.to_string());
        record.put_string("kind", self.info.kind.as_str());
        put_position(&mut record, "start", self.info.start);
        put_position(&mut record, "end", self.info.end);
        record
    }

    /// Decode an area description. Refresh state starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::MalformedRecord`] if the id or kind is missing
    /// or unparseable, or the area is wider than [`MAX_AREA_SIDE`].
    pub fn from_record(record: &Record) -> Result<Self, ColonyError> {
        let id = Uuid::parse_str(record.get_string("id")).map_err(|e| {
            ColonyError::MalformedRecord {
                reason: format!("area id: {e}"),
            }
        })?;
        let kind = AreaKind::from_persisted(record.get_string("kind")).ok_or_else(|| {
            ColonyError::MalformedRecord {
                reason: format!("area kind: {:?}", record.get_string("kind")),
            }
        })?;
        let info = AreaInfo {
            id: AreaId::from(id),
            kind,
            start: get_position(record, "start"),
            end: get_position(record, "end"),
        };
        if let Some(reason) = oversized(&info) {
            return Err(ColonyError::MalformedRecord { reason });
        }
        Ok(Self::new(info))
    }
}

fn put_position(record: &mut Record, prefix: &str, position: Position) {
    record.put_int(&format!("{prefix}X"), position.x);
    record.put_int(&format!("{prefix}Y"), position.y);
    record.put_int(&format!("{prefix}Z"), position.z);
}

fn get_position(record: &Record, prefix: &str) -> Position {
    Position::new(
        record.get_int(&format!("{prefix}X")),
        record.get_int(&format!("{prefix}Y")),
        record.get_int(&format!("{prefix}Z")),
    )
}

// ---------------------------------------------------------------------------
// AreaRegistry
// ---------------------------------------------------------------------------

/// What one registry tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AreasTick {
    /// Area refreshed on this tick, if it was a quantum boundary.
    pub refreshed: Option<AreaId>,
    /// Whether a snapshot sync was sent.
    pub synced: bool,
}

/// All automation areas of one colony.
#[derive(Debug, Clone)]
pub struct AreaRegistry {
    areas: Vec<ServerArea>,
    scheduler: RoundRobin,
    needs_sync: bool,
}

impl AreaRegistry {
    /// Create an empty registry refreshing one area every `refresh_interval`
    /// ticks.
    pub const fn new(refresh_interval: NonZeroU32) -> Self {
        Self {
            areas: Vec::new(),
            scheduler: RoundRobin::new(refresh_interval),
            needs_sync: false,
        }
    }

    /// Number of areas.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Whether there are no areas.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Whether a sync is pending for the next tick.
    pub const fn needs_sync(&self) -> bool {
        self.needs_sync
    }

    /// Look up an area by id.
    pub fn get(&self, id: AreaId) -> Option<&ServerArea> {
        self.areas.iter().find(|a| a.id() == id)
    }

    /// Immutable snapshots of every area, in registry order.
    pub fn snapshots(&self) -> Vec<AreaInfo> {
        self.areas.iter().map(|a| a.info().clone()).collect()
    }

    /// Add a new area.
    ///
    /// # Errors
    ///
    /// Returns [`ColonyError::InvalidArgument`] if an area with the same id
    /// already exists or a horizontal side exceeds [`MAX_AREA_SIDE`].
    pub fn add_area(&mut self, info: AreaInfo) -> Result<(), ColonyError> {
        if let Some(reason) = oversized(&info) {
            return Err(ColonyError::invalid_argument(reason));
        }
        if self.get(info.id).is_some() {
            return Err(ColonyError::invalid_argument(format!(
                "area {} already exists",
                info.id
            )));
        }
        info!(area = %info.id, kind = info.kind.as_str(), "automation area added");
        self.areas.push(ServerArea::new(info));
        self.schedule_sync();
        Ok(())
    }

    /// Tear down and detach every area with this id. Returns how many were
    /// removed (0 or 1 while ids are unique).
    pub fn remove_area(&mut self, id: AreaId) -> usize {
        let mut removed = 0_usize;
        for index in (0..self.areas.len()).rev() {
            let matches = self.areas.get(index).is_some_and(|a| a.id() == id);
            if !matches {
                continue;
            }
            let mut area = self.areas.remove(index);
            area.reset();
            self.scheduler.on_removed(index);
            removed = removed.saturating_add(1);
        }
        info!(area = %id, removed, "automation area removed");
        self.schedule_sync();
        removed
    }

    /// Advance the registry by one tick on behalf of `requester`.
    ///
    /// Every quantum refreshes the next area in round-robin order. If
    /// anything changed, one snapshot sync is sent. Without a requester
    /// there is nobody to sync to and the tick is skipped entirely.
    pub fn tick(
        &mut self,
        requester: Option<PlayerId>,
        world: &dyn WorldOracle,
        transport: &mut dyn ServerTransport,
    ) -> AreasTick {
        let Some(requester) = requester else {
            return AreasTick::default();
        };
        let mut outcome = AreasTick::default();

        if let Some(index) = self.scheduler.next_due(self.areas.len()) {
            let tick = self.scheduler.counter();
            if let Some(area) = self.areas.get_mut(index) {
                area.refresh(world, tick);
                debug!(
                    area = %area.id(),
                    work_cells = area.state().work_cells.len(),
                    tick,
                    "automation area refreshed"
                );
                outcome.refreshed = Some(area.id());
                self.schedule_sync();
            }
        }

        if self.needs_sync {
            let areas = self.snapshots();
            debug!(recipient = %requester, areas = areas.len(), "areas sync sent");
            transport.deliver(requester, ClientboundMessage::SyncAreas { areas });
            self.needs_sync = false;
            outcome.synced = true;
        }
        outcome
    }

    /// Areas whose kind satisfies `requirement`.
    pub fn query_by_requirement<'a>(
        &'a self,
        requirement: &'a str,
    ) -> impl Iterator<Item = &'a ServerArea> + 'a {
        self.areas.iter().filter(move |a| a.kind().satisfies(requirement))
    }

    /// Write all areas into `record` under a nested compound.
    pub fn write(&self, record: &mut Record) {
        let mut manager = Record::new();
        manager.put_list(KEY_AREAS, self.areas.iter().map(ServerArea::to_record).collect());
        record.put_compound(KEY_MANAGER, manager);
    }

    /// Replace all areas with those stored in `record` and schedule a sync.
    ///
    /// Malformed entries are skipped with a warning.
    pub fn read(&mut self, record: &Record) {
        self.areas.clear();
        self.scheduler.rewind();
        if let Some(manager) = record.get_compound(KEY_MANAGER) {
            for entry in manager.get_list(KEY_AREAS) {
                match ServerArea::from_record(&entry) {
                    Ok(area) if self.get(area.id()).is_some() => {
                        warn!(area = %area.id(), "duplicate persisted area skipped");
                    }
                    Ok(area) => self.areas.push(area),
                    Err(e) => warn!(error = %e, "persisted area skipped"),
                }
            }
        }
        debug!(areas = self.areas.len(), "automation areas restored");
        self.schedule_sync();
    }

    /// Force a snapshot sync on the next tick.
    pub const fn schedule_sync(&mut self) {
        self.needs_sync = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::CHANNEL_AREAS_SYNC;
    use colony_world::FlatWorld;

    use super::*;
    use crate::transport::ServerOutbox;

    fn registry() -> AreaRegistry {
        AreaRegistry::new(NonZeroU32::new(20).unwrap())
    }

    fn area(kind: AreaKind) -> AreaInfo {
        AreaInfo {
            id: AreaId::new(),
            kind,
            start: Position::new(0, 63, 0),
            end: Position::new(2, 66, 1),
        }
    }

    fn tick_n(
        registry: &mut AreaRegistry,
        n: usize,
        player: PlayerId,
        world: &FlatWorld,
        outbox: &mut ServerOutbox,
    ) -> Vec<AreaId> {
        (0..n)
            .filter_map(|_| registry.tick(Some(player), world, outbox).refreshed)
            .collect()
    }

    #[test]
    fn scenario_remove_middle_area_keeps_order() {
        let mut registry = registry();
        let world = FlatWorld::new(64, 1);
        let mut outbox = ServerOutbox::new();
        let player = PlayerId::new();
        let (a, b, c) = (area(AreaKind::Farming), area(AreaKind::Mining), area(AreaKind::Logging));
        for info in [a.clone(), b.clone(), c.clone()] {
            registry.add_area(info).unwrap();
        }

        assert_eq!(tick_n(&mut registry, 20, player, &world, &mut outbox), vec![a.id]);
        assert_eq!(tick_n(&mut registry, 20, player, &world, &mut outbox), vec![b.id]);
        assert_eq!(registry.remove_area(b.id), 1);
        assert_eq!(tick_n(&mut registry, 20, player, &world, &mut outbox), vec![c.id]);
        assert_eq!(tick_n(&mut registry, 20, player, &world, &mut outbox), vec![a.id]);
    }

    #[test]
    fn every_area_refreshed_within_n_quanta() {
        let mut registry = registry();
        let world = FlatWorld::new(64, 1);
        let mut outbox = ServerOutbox::new();
        let player = PlayerId::new();
        for _ in 0..4 {
            registry.add_area(area(AreaKind::Farming)).unwrap();
        }
        tick_n(&mut registry, 80, player, &world, &mut outbox);
        for info in registry.snapshots() {
            let area = registry.get(info.id).unwrap();
            assert_eq!(area.state().refresh_count, 1);
        }
    }

    #[test]
    fn refresh_finds_surface_cells_in_range() {
        let mut world = FlatWorld::new(64, 1);
        world.place_block(Position::new(1, 64, 0));
        world.place_block(Position::new(1, 65, 0));
        world.place_block(Position::new(1, 66, 0));
        world.place_block(Position::new(1, 67, 0));
        let mut server_area = ServerArea::new(area(AreaKind::Farming));
        server_area.refresh(&world, 20);
        // 3x2 columns, one of which now tops out above the area.
        assert_eq!(server_area.state().work_cells.len(), 5);
        assert_eq!(server_area.state().last_refreshed_tick, Some(20));
        server_area.reset();
        assert!(server_area.state().work_cells.is_empty());
    }

    #[test]
    fn changes_coalesce_into_one_snapshot_sync() {
        let mut registry = registry();
        let world = FlatWorld::new(64, 1);
        let mut outbox = ServerOutbox::new();
        let player = PlayerId::new();
        let first = area(AreaKind::Farming);
        registry.add_area(first.clone()).unwrap();
        registry.add_area(area(AreaKind::Mining)).unwrap();
        registry.remove_area(first.id);

        let outcome = registry.tick(Some(player), &world, &mut outbox);
        assert!(outcome.synced);
        assert!(!registry.tick(Some(player), &world, &mut outbox).synced);
        assert_eq!(outbox.count_on(CHANNEL_AREAS_SYNC), 1);
        let sent = outbox.sent().first().unwrap();
        assert!(matches!(&sent.message, ClientboundMessage::SyncAreas { areas } if areas.len() == 1));
    }

    #[test]
    fn quantum_refresh_triggers_sync() {
        let mut registry = registry();
        let world = FlatWorld::new(64, 1);
        let mut outbox = ServerOutbox::new();
        let player = PlayerId::new();
        registry.add_area(area(AreaKind::Farming)).unwrap();
        tick_n(&mut registry, 19, player, &world, &mut outbox);
        assert_eq!(outbox.drain().len(), 1);
        tick_n(&mut registry, 1, player, &world, &mut outbox);
        assert_eq!(outbox.drain().len(), 1);
    }

    #[test]
    fn no_requester_means_no_work() {
        let mut registry = registry();
        let world = FlatWorld::new(64, 1);
        let mut outbox = ServerOutbox::new();
        registry.add_area(area(AreaKind::Farming)).unwrap();
        for _ in 0..40 {
            assert_eq!(registry.tick(None, &world, &mut outbox), AreasTick::default());
        }
        assert!(outbox.sent().is_empty());
        assert!(registry.needs_sync());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = registry();
        let info = area(AreaKind::Farming);
        registry.add_area(info.clone()).unwrap();
        assert!(matches!(
            registry.add_area(info),
            Err(ColonyError::InvalidArgument { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn oversized_areas_are_rejected() {
        let mut registry = registry();
        let side = i32::try_from(MAX_AREA_SIDE).unwrap();
        let mut widest = area(AreaKind::Logging);
        widest.start = Position::new(-10, 63, 0);
        widest.end = Position::new(side - 11, 66, side - 1);
        registry.add_area(widest).unwrap();

        let mut too_wide = area(AreaKind::Logging);
        too_wide.start = Position::new(0, 63, 0);
        too_wide.end = Position::new(side, 66, 0);
        assert!(matches!(
            registry.add_area(too_wide),
            Err(ColonyError::InvalidArgument { .. })
        ));

        let mut too_deep = area(AreaKind::Mining);
        too_deep.end = Position::new(0, 66, i32::MAX);
        too_deep.start = Position::new(0, 63, i32::MIN);
        assert!(registry.add_area(too_deep).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn oversized_persisted_area_is_skipped() {
        let mut huge = ServerArea::new(area(AreaKind::Farming)).to_record();
        huge.put_int("endX", 10_000);
        assert!(matches!(
            ServerArea::from_record(&huge),
            Err(ColonyError::MalformedRecord { .. })
        ));
        let mut manager = Record::new();
        manager.put_list("areas", vec![huge]);
        let mut record = Record::new();
        record.put_compound("areaManager", manager);
        let mut restored = registry();
        restored.read(&record);
        assert!(restored.is_empty());
    }

    #[test]
    fn removing_unknown_area_still_syncs() {
        let mut registry = registry();
        assert_eq!(registry.remove_area(AreaId::new()), 0);
        assert!(registry.needs_sync());
    }

    #[test]
    fn query_by_requirement_filters_on_kind() {
        let mut registry = registry();
        registry.add_area(area(AreaKind::Farming)).unwrap();
        registry.add_area(area(AreaKind::Mining)).unwrap();
        registry.add_area(area(AreaKind::Farming)).unwrap();
        assert_eq!(registry.query_by_requirement("farm_wheat").count(), 2);
        assert_eq!(registry.query_by_requirement("miner1").count(), 1);
        assert_eq!(registry.query_by_requirement("baker").count(), 0);
    }

    #[test]
    fn persistence_round_trip_marks_dirty() {
        let mut registry = registry();
        let a = area(AreaKind::Farming);
        let b = area(AreaKind::Logging);
        registry.add_area(a.clone()).unwrap();
        registry.add_area(b.clone()).unwrap();
        let mut record = Record::new();
        registry.write(&mut record);

        let mut restored = AreaRegistry::new(NonZeroU32::new(20).unwrap());
        restored.read(&record);
        assert_eq!(restored.snapshots(), vec![a, b]);
        assert!(restored.needs_sync());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let mut good = ServerArea::new(area(AreaKind::Mining)).to_record();
        let mut bad = good.clone();
        bad.put_string("kind", "fishing");
        let mut bad_id = Record::new();
        bad_id.put_string("id", "not-a-uuid");
        let mut manager = Record::new();
        good.put_int("startX", 5);
        manager.put_list("areas", vec![bad, good, bad_id]);
        let mut record = Record::new();
        record.put_compound("areaManager", manager);

        let mut restored = registry();
        restored.read(&record);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.snapshots().first().map(|a| a.start.x), Some(5));
    }

    #[test]
    fn reading_empty_record_clears_and_syncs() {
        let mut registry = registry();
        registry.add_area(area(AreaKind::Farming)).unwrap();
        registry.read(&Record::new());
        assert!(registry.is_empty());
        assert!(registry.needs_sync());
    }
}
