use std::fmt;

use crate::cells::{CellCoordinate, CellState};
use crate::grid::OccupancyGrid;
use crate::utils::{fnv_hashset, FnvHashSet};

pub const OPEN_FILL: &str = "....";
pub const BLOCKED_FILL: &str = "==";

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// Open cells should stay as wide as `OPEN_FILL` so rows line up.
    fn render_cell_body(&self, _: CellCoordinate, state: CellState) -> String {
        default_cell_body(state)
    }
}

pub fn default_cell_body(state: CellState) -> String {
    match state {
        CellState::Open => String::from(OPEN_FILL),
        CellState::Blocked => String::from(BLOCKED_FILL),
    }
}

/// Plain open/blocked fill, no decorations.
#[derive(Debug, Copy, Clone)]
pub struct OccupancyDisplay;
impl GridDisplay for OccupancyDisplay {}

#[derive(Debug)]
pub struct StartGoalDisplay {
    start: CellCoordinate,
    goal: CellCoordinate,
}
impl StartGoalDisplay {
    pub fn new(start: CellCoordinate, goal: CellCoordinate) -> StartGoalDisplay {
        StartGoalDisplay { start, goal }
    }
}
impl GridDisplay for StartGoalDisplay {
    fn render_cell_body(&self, coord: CellCoordinate, state: CellState) -> String {
        // A single open cell is both, start wins.
        if coord == self.start {
            String::from(".S..")
        } else if coord == self.goal {
            String::from(".G..")
        } else {
            default_cell_body(state)
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<CellCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[CellCoordinate]) -> Self {
        let mut on_path_coordinates = fnv_hashset(path.len());
        on_path_coordinates.extend(path.iter().cloned());
        PathDisplay { on_path_coordinates }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: CellCoordinate, state: CellState) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(".oo.")
        } else {
            default_cell_body(state)
        }
    }
}

/// Diagnostic text dump of an occupancy grid.
///
/// One line per row, from the highest row index down to row 0, so the printout reads with
/// world +Z pointing up the screen.
pub struct DebugOverlay<'a> {
    grid: &'a OccupancyGrid,
    display: &'a dyn GridDisplay,
}

impl<'a> DebugOverlay<'a> {
    pub fn new(grid: &'a OccupancyGrid) -> DebugOverlay<'a> {
        DebugOverlay {
            grid,
            display: &OccupancyDisplay,
        }
    }

    pub fn with_display(grid: &'a OccupancyGrid, display: &'a dyn GridDisplay) -> DebugOverlay<'a> {
        DebugOverlay { grid, display }
    }
}

impl<'a> fmt::Display for DebugOverlay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut output = String::with_capacity(self.grid.size() * OPEN_FILL.len() +
                                               self.grid.rows().0);

        for row in self.grid.iter_row().rev() {
            for cell_coord in row {
                let state = self.grid.state(cell_coord).unwrap_or(CellState::Blocked);
                output.push_str(&self.display.render_cell_body(cell_coord, state));
            }
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&DebugOverlay::new(self), f)
    }
}
