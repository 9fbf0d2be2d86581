//! Placement of the start and goal cells of a maze.
//!
//! Both are found by plain scans with no randomness: the start is the first open cell in
//! row-major order, the goal the first open cell scanning backwards from the last cell. The
//! two scans are independent of each other, so a grid with a single open cell puts both on it.

use log::debug;

use crate::cells::CellCoordinate;
use crate::errors::*;
use crate::grid::OccupancyGrid;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StartGoal {
    pub start: CellCoordinate,
    pub goal: CellCoordinate,
}

impl StartGoal {
    pub fn is_single_cell(&self) -> bool {
        self.start == self.goal
    }
}

/// First open cell scanning rows ascending, then columns ascending.
pub fn find_start(grid: &OccupancyGrid) -> Result<CellCoordinate> {
    grid.iter_open()
        .next()
        .ok_or_else(|| ErrorKind::EmptyGrid.into())
}

/// First open cell scanning rows descending, then columns descending.
pub fn find_goal(grid: &OccupancyGrid) -> Result<CellCoordinate> {
    grid.iter_open()
        .next_back()
        .ok_or_else(|| ErrorKind::EmptyGrid.into())
}

pub fn locate(grid: &OccupancyGrid) -> Result<StartGoal> {
    let start_goal = StartGoal {
        start: find_start(grid)?,
        goal: find_goal(grid)?,
    };
    debug!("start {} goal {}", start_goal.start, start_goal.goal);
    Ok(start_goal)
}
