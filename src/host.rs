//! What the maze core needs from the environment that shows and simulates it.
//!
//! A host installs the mesh of the current maze and runs the two trigger zones sitting on the
//! start and goal cells. When something enters a zone the host reports it back through
//! `MazeSession::notify_enter`.

use glam::Vec3;
use itertools::Itertools;
use log::debug;
use std::fmt;

use crate::cells::CellCoordinate;
use crate::mesh::{Mesh, MeshStats};
use crate::utils::{fnv_hashmap, FnvHashMap};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct GeometryHandle(pub u64);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ZoneHandle(pub u64);

/// Whatever entered a trigger zone, a player controller for instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BodyHandle(pub u64);

impl fmt::Display for ZoneHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// Called with the zone entered and the body that entered it.
pub type TriggerCallback = Box<dyn FnMut(ZoneHandle, BodyHandle)>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ZoneKind {
    Start,
    Goal,
}

/// An axis aligned, non blocking box that reports bodies entering it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriggerZoneSpec {
    pub kind: ZoneKind,
    pub cell: CellCoordinate,
    pub center: Vec3,
    pub size: Vec3,
}

impl TriggerZoneSpec {
    /// Height of the zone centre above the floor.
    pub const LIFT: f32 = 0.5;

    /// A unit cube standing on the floor at `floor_center`.
    pub fn on_cell(kind: ZoneKind, cell: CellCoordinate, floor_center: Vec3) -> TriggerZoneSpec {
        TriggerZoneSpec {
            kind,
            cell,
            center: floor_center + Vec3::Y * TriggerZoneSpec::LIFT,
            size: Vec3::ONE,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let offset = (point - self.center).abs();
        let half = self.size * 0.5;
        offset.x <= half.x && offset.y <= half.y && offset.z <= half.z
    }
}

pub trait GeometrySink {
    fn install(&mut self, mesh: &Mesh) -> GeometryHandle;
    fn remove(&mut self, handle: GeometryHandle);
}

pub trait TriggerRegistry {
    /// Creates a zone and returns its handle.
    ///
    /// A handle must never be handed out twice over the life of the registry, not even after
    /// the zone it named was destroyed. Sessions route entry notifications by handle alone, so
    /// a recycled handle would let a late notification for a torn down zone reach the callback
    /// of whichever zone reuses it.
    fn create_zone(&mut self, spec: &TriggerZoneSpec) -> ZoneHandle;
    fn destroy_zone(&mut self, zone: ZoneHandle);
}

/// Everything a maze session drives.
pub trait MazeHost: GeometrySink + TriggerRegistry {}

impl<T: GeometrySink + TriggerRegistry> MazeHost for T {}

/// Host that keeps everything in memory, for command line runs and tests.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_handle: u64,
    geometry: FnvHashMap<GeometryHandle, MeshStats>,
    zones: FnvHashMap<ZoneHandle, TriggerZoneSpec>,
    installs: usize,
    removals: usize,
    zones_created: usize,
    zones_destroyed: usize,
}

impl HeadlessHost {
    pub fn new() -> HeadlessHost {
        HeadlessHost {
            next_handle: 1,
            geometry: fnv_hashmap(1),
            zones: fnv_hashmap(2),
            ..Default::default()
        }
    }

    fn allocate_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    pub fn installed_geometry(&self) -> Vec<GeometryHandle> {
        self.geometry.keys().cloned().sorted().collect()
    }

    pub fn geometry_stats(&self, handle: GeometryHandle) -> Option<MeshStats> {
        self.geometry.get(&handle).cloned()
    }

    pub fn live_zones(&self) -> Vec<ZoneHandle> {
        self.zones.keys().cloned().sorted().collect()
    }

    pub fn zone(&self, zone: ZoneHandle) -> Option<&TriggerZoneSpec> {
        self.zones.get(&zone)
    }

    /// Live zones containing a world position, as a physics step would report them.
    pub fn zones_at(&self, point: Vec3) -> Vec<ZoneHandle> {
        self.zones
            .iter()
            .filter(|&(_, spec)| spec.contains(point))
            .map(|(handle, _)| *handle)
            .sorted()
            .collect()
    }

    pub fn install_count(&self) -> usize {
        self.installs
    }

    pub fn removal_count(&self) -> usize {
        self.removals
    }

    pub fn zones_created(&self) -> usize {
        self.zones_created
    }

    pub fn zones_destroyed(&self) -> usize {
        self.zones_destroyed
    }
}

impl GeometrySink for HeadlessHost {
    fn install(&mut self, mesh: &Mesh) -> GeometryHandle {
        let handle = GeometryHandle(self.allocate_handle());
        self.geometry.insert(handle, mesh.stats());
        self.installs += 1;
        debug!("headless host installed geometry {:?}", handle);
        handle
    }

    fn remove(&mut self, handle: GeometryHandle) {
        if self.geometry.remove(&handle).is_some() {
            self.removals += 1;
            debug!("headless host removed geometry {:?}", handle);
        }
    }
}

impl TriggerRegistry for HeadlessHost {
    fn create_zone(&mut self, spec: &TriggerZoneSpec) -> ZoneHandle {
        let zone = ZoneHandle(self.allocate_handle());
        self.zones.insert(zone, *spec);
        self.zones_created += 1;
        zone
    }

    fn destroy_zone(&mut self, zone: ZoneHandle) {
        if self.zones.remove(&zone).is_some() {
            self.zones_destroyed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OccupancyGrid;
    use crate::mesh::MeshSynthesizer;

    #[test]
    fn zone_spec_is_a_lifted_unit_cube() {
        let spec = TriggerZoneSpec::on_cell(ZoneKind::Goal,
                                            CellCoordinate::new(2, 3),
                                            Vec3::new(11.25, 0.0, 7.5));
        assert_eq!(spec.center, Vec3::new(11.25, 0.5, 7.5));
        assert_eq!(spec.size, Vec3::ONE);
        assert!(spec.contains(Vec3::new(11.25, 0.0, 7.5)));
        assert!(spec.contains(Vec3::new(11.7, 0.9, 7.1)));
        assert!(!spec.contains(Vec3::new(11.25, 1.5, 7.5)));
        assert!(!spec.contains(Vec3::new(12.0, 0.5, 7.5)));
    }

    #[test]
    fn headless_host_tracks_geometry() {
        let mut host = HeadlessHost::new();
        let mesh = MeshSynthesizer::default().build(&OccupancyGrid::parse(".").unwrap()).unwrap();

        let first = host.install(&mesh);
        let second = host.install(&mesh);
        assert_ne!(first, second);
        assert_eq!(host.installed_geometry(), vec![first, second]);
        assert_eq!(host.geometry_stats(first), Some(mesh.stats()));

        host.remove(first);
        host.remove(first);
        assert_eq!(host.installed_geometry(), vec![second]);
        assert_eq!(host.install_count(), 2);
        assert_eq!(host.removal_count(), 1);
        assert_eq!(host.geometry_stats(first), None);
    }

    #[test]
    fn headless_host_tracks_zones() {
        let mut host = HeadlessHost::new();
        let start = TriggerZoneSpec::on_cell(ZoneKind::Start, CellCoordinate::new(0, 0), Vec3::ZERO);
        let goal = TriggerZoneSpec::on_cell(ZoneKind::Goal,
                                            CellCoordinate::new(0, 2),
                                            Vec3::new(7.5, 0.0, 0.0));
        let start_zone = host.create_zone(&start);
        let goal_zone = host.create_zone(&goal);

        assert_eq!(host.live_zones(), vec![start_zone, goal_zone]);
        assert_eq!(host.zone(goal_zone).map(|spec| spec.kind), Some(ZoneKind::Goal));
        assert_eq!(host.zones_at(Vec3::new(7.5, 0.2, 0.0)), vec![goal_zone]);
        assert!(host.zones_at(Vec3::new(3.75, 0.2, 0.0)).is_empty());

        host.destroy_zone(start_zone);
        assert_eq!(host.live_zones(), vec![goal_zone]);
        assert_eq!(host.zones_created(), 2);
        assert_eq!(host.zones_destroyed(), 1);
    }
}
