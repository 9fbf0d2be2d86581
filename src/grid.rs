use bit_set::BitSet;
use std::fmt;

use crate::cells::{CellCoordinate, CellState, CompassPrimary, CoordinateOptionSmallVec,
                   CoordinateSmallVec};
use crate::errors::*;
use crate::grid_dimensions::MazeDimensions;
use crate::grid_iterators::{CellIter, RowIter};
use crate::units::{ColumnsCount, RowsCount};

/// Fixed size 2D array of open and blocked cells, indexed `[row, col]`.
///
/// Stored as a bit set of the blocked cells in row-major order.
#[derive(Clone, Eq, PartialEq)]
pub struct OccupancyGrid {
    dimensions: MazeDimensions,
    blocked: BitSet,
}

impl fmt::Debug for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "OccupancyGrid :: dimensions: {}, open cells: {}",
               self.dimensions,
               self.open_cells_count())
    }
}

impl OccupancyGrid {
    /// A grid where every cell is blocked, the usual starting point for carving.
    pub fn blocked(dimensions: MazeDimensions) -> OccupancyGrid {
        let cells_count = dimensions.size().0;
        let mut blocked = BitSet::with_capacity(cells_count);
        for index in 0..cells_count {
            blocked.insert(index);
        }
        OccupancyGrid { dimensions, blocked }
    }

    /// A grid where every cell is open.
    pub fn open(dimensions: MazeDimensions) -> OccupancyGrid {
        OccupancyGrid {
            dimensions,
            blocked: BitSet::with_capacity(dimensions.size().0),
        }
    }

    /// Parses a text layout, one line per row starting with row 0.
    /// `#` is a blocked cell and `.` an open cell. Blank lines and surrounding whitespace are
    /// ignored.
    pub fn parse(layout: &str) -> Result<OccupancyGrid> {
        let lines: Vec<&str> = layout.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let columns = lines.first().map_or(0, |line| line.chars().count());
        let dimensions = MazeDimensions::new(RowsCount(lines.len()), ColumnsCount(columns))?;
        let mut grid = OccupancyGrid::open(dimensions);

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != columns {
                bail!(ErrorKind::InvalidLayout(format!("row {} is {} cells wide, expected {}",
                                                       row,
                                                       line.chars().count(),
                                                       columns)));
            }
            for (col, glyph) in line.chars().enumerate() {
                let state = match glyph {
                    '#' => CellState::Blocked,
                    '.' => CellState::Open,
                    other => {
                        bail!(ErrorKind::InvalidLayout(format!("unexpected '{}' at row {}, col {}",
                                                               other,
                                                               row,
                                                               col)))
                    }
                };
                grid.set(CellCoordinate::new(row, col), state);
            }
        }

        Ok(grid)
    }

    #[inline]
    pub fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: CellCoordinate) -> bool {
        coord.row < self.rows().0 && coord.col < self.columns().0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: CellCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row * self.columns().0 + coord.col)
        } else {
            None
        }
    }

    /// State of the cell, None if the coordinate is outside the grid.
    pub fn state(&self, coord: CellCoordinate) -> Option<CellState> {
        self.grid_coordinate_to_index(coord).map(|index| {
            if self.blocked.contains(index) {
                CellState::Blocked
            } else {
                CellState::Open
            }
        })
    }

    /// Coordinates outside the grid are never open.
    #[inline]
    pub fn is_open(&self, coord: CellCoordinate) -> bool {
        self.state(coord) == Some(CellState::Open)
    }

    /// Sets the state of a cell. Returns false, leaving the grid untouched, if the coordinate
    /// is outside the grid.
    pub fn set(&mut self, coord: CellCoordinate, state: CellState) -> bool {
        if let Some(index) = self.grid_coordinate_to_index(coord) {
            match state {
                CellState::Blocked => self.blocked.insert(index),
                CellState::Open => self.blocked.remove(index),
            };
            true
        } else {
            false
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: CellCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<CellCoordinate> {
        coord.offset(direction)
            .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    pub fn neighbours_at_directions(&self,
                                    coord: CellCoordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    /// Cells to the North, East, West or South of a cell that are inside the grid, whatever
    /// their state.
    pub fn neighbours(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        self.neighbours_at_directions(coord, &CompassPrimary::WALL_ORDER)
            .into_iter()
            .flatten()
            .collect()
    }

    /// Open cells directly adjacent to a cell.
    pub fn open_neighbours(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        self.neighbours(coord)
            .into_iter()
            .filter(|neighbour_coord| self.is_open(*neighbour_coord))
            .collect()
    }

    /// Does the side of an open cell in this direction need a wall?
    /// True when the neighbour is blocked or outside the grid.
    pub fn is_walled(&self, coord: CellCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(true, |neighbour_coord| !self.is_open(neighbour_coord))
    }

    pub fn open_cells_count(&self) -> usize {
        self.size() - self.blocked.len()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.rows(), self.columns())
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.rows(), self.columns())
    }

    pub fn iter_open(&self) -> impl DoubleEndedIterator<Item = CellCoordinate> + '_ {
        self.iter().filter(move |coord| self.is_open(*coord))
    }
}

impl<'a> IntoIterator for &'a OccupancyGrid {
    type Item = CellCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
