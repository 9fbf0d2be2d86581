use glam::Vec3;
use log::{debug, error, info, warn};
use std::fmt;

use crate::cells::CellCoordinate;
use crate::errors::*;
use crate::generators::GridGenerator;
use crate::grid::OccupancyGrid;
use crate::grid_dimensions::{InvalidDimensionsWarning, MazeDimensions};
use crate::host::{BodyHandle, GeometryHandle, MazeHost, TriggerCallback, TriggerZoneSpec,
                  ZoneHandle, ZoneKind};
use crate::locator::{self, StartGoal};
use crate::mesh::{Mesh, MeshStats, MeshSynthesizer};
use crate::pathing::Distances;
use crate::units::{ColumnsCount, HallHeight, HallWidth, RowsCount};
use crate::utils::{fnv_hashmap, fnv_hashset, FnvHashMap, FnvHashSet};

/// Summary of one successful `MazeSession::new_maze`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BuildReport {
    pub dimensions: MazeDimensions,
    pub warning: Option<InvalidDimensionsWarning>,
    pub start_goal: StartGoal,
    pub open_cells: usize,
    pub mesh: MeshStats,
    /// Steps along the shortest walk from the start to the goal.
    pub path_length: Option<u32>,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "{} maze, {} open cells, start {} goal {}",
               self.dimensions,
               self.open_cells,
               self.start_goal.start,
               self.start_goal.goal)?;
        if let Some(steps) = self.path_length {
            write!(f, " ({} steps apart)", steps)?;
        }
        write!(f, ", {}", self.mesh)
    }
}

/// Result of routing a trigger notification.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TriggerDelivery {
    Delivered,
    /// The zone is live but was created without a callback.
    NoListener,
    /// The zone was destroyed, on its own or with the maze it belonged to.
    Stale,
}

/// Everything belonging to the maze currently shown by the host.
#[derive(Debug)]
struct InstalledMaze {
    grid: OccupancyGrid,
    start_goal: StartGoal,
    mesh: Mesh,
    geometry: GeometryHandle,
    start_zone: ZoneHandle,
    goal_zone: ZoneHandle,
}

/// Builds mazes one after another and keeps the latest one installed in a host.
pub struct MazeSession<G, H> {
    generator: G,
    synthesizer: MeshSynthesizer,
    host: H,
    current: Option<InstalledMaze>,
    listeners: FnvHashMap<ZoneHandle, Option<TriggerCallback>>,
    /// Every zone handle the host has returned so far.
    issued_zones: FnvHashSet<ZoneHandle>,
}

impl<G, H> fmt::Debug for MazeSession<G, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "MazeSession :: {:?}, current maze: {:?}, live zones: {}",
               self.synthesizer,
               self.current.as_ref().map(|maze| maze.grid.dimensions()),
               self.listeners.len())
    }
}

impl<G: GridGenerator, H: MazeHost> MazeSession<G, H> {
    pub fn new(generator: G, synthesizer: MeshSynthesizer, host: H) -> MazeSession<G, H> {
        MazeSession {
            generator,
            synthesizer,
            host,
            current: None,
            listeners: fnv_hashmap(2),
            issued_zones: fnv_hashset(2),
        }
    }

    /// Replaces the current maze with a freshly generated `rows` x `columns` one.
    ///
    /// The new grid, start/goal and mesh are all built before the old maze is touched, so on
    /// error the previous maze stays installed and its zones keep firing.
    pub fn new_maze(&mut self,
                    rows: RowsCount,
                    columns: ColumnsCount,
                    on_start_enter: Option<TriggerCallback>,
                    on_goal_enter: Option<TriggerCallback>)
                    -> Result<BuildReport> {
        let dimensions = MazeDimensions::new(rows, columns)?;
        let warning = dimensions.dimension_warning();
        if let Some(w) = warning {
            warn!("{}", w);
        }

        let grid = self.generator
            .generate(dimensions)
            .chain_err(|| format!("failed to generate a {} maze", dimensions))?;
        let start_goal = locator::locate(&grid)?;
        let mesh = self.synthesizer.build(&grid)?;

        self.teardown();

        let geometry = self.host.install(&mesh);
        let start_zone = self.place_zone(ZoneKind::Start, start_goal.start, on_start_enter);
        let goal_zone = self.place_zone(ZoneKind::Goal, start_goal.goal, on_goal_enter);

        let path_length = Distances::new(&grid, start_goal.start)
            .and_then(|distances| distances.distance_from_start_to(start_goal.goal));
        let report = BuildReport {
            dimensions,
            warning,
            start_goal,
            open_cells: grid.open_cells_count(),
            mesh: mesh.stats(),
            path_length,
        };
        info!("installed {}", report);

        self.current = Some(InstalledMaze {
            grid,
            start_goal,
            mesh,
            geometry,
            start_zone,
            goal_zone,
        });
        Ok(report)
    }

    fn place_zone(&mut self,
                  kind: ZoneKind,
                  cell: CellCoordinate,
                  callback: Option<TriggerCallback>)
                  -> ZoneHandle {
        let spec = TriggerZoneSpec::on_cell(kind, cell, self.synthesizer.cell_to_world(cell));
        let zone = self.host.create_zone(&spec);
        let fresh = self.issued_zones.insert(zone);
        debug_assert!(fresh, "host reused zone handle {}", zone);
        if !fresh {
            error!("host reused {}, late notifications for its old zone can not be told apart", zone);
        }
        self.listeners.insert(zone, callback);
        zone
    }

    /// Removes the current maze's geometry and its remaining zones from the host.
    fn teardown(&mut self) {
        if let Some(old) = self.current.take() {
            debug!("tearing down {} maze", old.grid.dimensions());
            self.host.remove(old.geometry);
            for zone in &[old.start_zone, old.goal_zone] {
                if self.listeners.remove(zone).is_some() {
                    self.host.destroy_zone(*zone);
                }
            }
        }
        self.listeners.clear();
    }

    /// Tears the current maze down without building another.
    pub fn dispose(&mut self) {
        self.teardown();
    }

    /// Entry point for the host when `body` enters `zone`.
    pub fn notify_enter(&mut self, zone: ZoneHandle, body: BodyHandle) -> TriggerDelivery {
        match self.listeners.get_mut(&zone) {
            Some(Some(callback)) => {
                callback(zone, body);
                TriggerDelivery::Delivered
            }
            Some(None) => TriggerDelivery::NoListener,
            None => {
                warn!("ignoring enter notification for stale {}", zone);
                TriggerDelivery::Stale
            }
        }
    }

    /// Removes one zone of the current maze, e.g. once the treasure on the goal is picked up.
    /// Returns false if the zone was not live.
    pub fn destroy_zone(&mut self, zone: ZoneHandle) -> bool {
        if self.listeners.remove(&zone).is_some() {
            self.host.destroy_zone(zone);
            true
        } else {
            false
        }
    }
}

impl<G, H> MazeSession<G, H> {
    pub fn grid(&self) -> Option<&OccupancyGrid> {
        self.current.as_ref().map(|maze| &maze.grid)
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.current.as_ref().map(|maze| &maze.mesh)
    }

    pub fn start(&self) -> Option<CellCoordinate> {
        self.current.as_ref().map(|maze| maze.start_goal.start)
    }

    pub fn goal(&self) -> Option<CellCoordinate> {
        self.current.as_ref().map(|maze| maze.start_goal.goal)
    }

    /// The start zone, unless there is no maze or the zone was destroyed.
    pub fn start_zone(&self) -> Option<ZoneHandle> {
        self.current
            .as_ref()
            .map(|maze| maze.start_zone)
            .filter(|zone| self.listeners.contains_key(zone))
    }

    /// The goal zone, unless there is no maze or the zone was destroyed.
    pub fn goal_zone(&self) -> Option<ZoneHandle> {
        self.current
            .as_ref()
            .map(|maze| maze.goal_zone)
            .filter(|zone| self.listeners.contains_key(zone))
    }

    pub fn hall_width(&self) -> HallWidth {
        self.synthesizer.hall_width()
    }

    pub fn hall_height(&self) -> HallHeight {
        self.synthesizer.hall_height()
    }

    pub fn cell_to_world(&self, coord: CellCoordinate) -> Vec3 {
        self.synthesizer.cell_to_world(coord)
    }

    pub fn start_world_position(&self) -> Option<Vec3> {
        self.start().map(|cell| self.cell_to_world(cell))
    }

    pub fn goal_world_position(&self) -> Option<Vec3> {
        self.goal().map(|cell| self.cell_to_world(cell))
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}
