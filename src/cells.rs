use glam::Vec3;
use smallvec::SmallVec;
use std::fmt;

use crate::units::{ColumnIndex, RowIndex};

pub type CoordinateSmallVec = SmallVec<[CellCoordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<CellCoordinate>; 4]>;

/// A `(row, col)` position on an occupancy grid.
///
/// Rows grow "southwards" and map to world +Z, columns grow "eastwards" and map to world +X.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct CellCoordinate {
    pub row: usize,
    pub col: usize,
}

impl CellCoordinate {
    pub fn new(row: usize, col: usize) -> CellCoordinate {
        CellCoordinate { row, col }
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> CellCoordinate {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        CellCoordinate::new(row, col)
    }

    #[inline]
    pub fn from_row_major_index(index: usize, columns: usize) -> CellCoordinate {
        CellCoordinate::new(index / columns, index % columns)
    }

    /// Creates a new coordinate offset 1 cell away in the given direction.
    ///
    /// Returns None if the coordinate is not representable (before row or column zero). The
    /// upper bounds depend on a grid and are checked there.
    pub fn offset(self, dir: CompassPrimary) -> Option<CellCoordinate> {
        let CellCoordinate { row, col } = self;
        match dir {
            CompassPrimary::North => {
                if row > 0 {
                    Some(CellCoordinate::new(row - 1, col))
                } else {
                    None
                }
            }
            CompassPrimary::South => Some(CellCoordinate::new(row + 1, col)),
            CompassPrimary::East => Some(CellCoordinate::new(row, col + 1)),
            CompassPrimary::West => {
                if col > 0 {
                    Some(CellCoordinate::new(row, col - 1))
                } else {
                    None
                }
            }
        }
    }
}

impl From<(usize, usize)> for CellCoordinate {
    fn from(row_col_pair: (usize, usize)) -> CellCoordinate {
        CellCoordinate::new(row_col_pair.0, row_col_pair.1)
    }
}

impl fmt::Display for CellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}

/// The state of one grid cell. The discriminants are the on-disk/legacy integer codes.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CellState {
    Open = 0,
    Blocked = 1,
}

impl CellState {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Any non zero code is treated as blocked.
    pub fn from_code(code: u8) -> CellState {
        if code == 0 {
            CellState::Open
        } else {
            CellState::Blocked
        }
    }

    #[inline]
    pub fn is_open(self) -> bool {
        self == CellState::Open
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// Wall emission order for a cell: north, east, west, south.
    pub const WALL_ORDER: [CompassPrimary; 4] = [
        CompassPrimary::North,
        CompassPrimary::East,
        CompassPrimary::West,
        CompassPrimary::South,
    ];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// Unit step in world space when moving one cell in this direction.
    pub fn world_offset(self) -> Vec3 {
        match self {
            CompassPrimary::North => Vec3::NEG_Z,
            CompassPrimary::South => Vec3::Z,
            CompassPrimary::East => Vec3::X,
            CompassPrimary::West => Vec3::NEG_X,
        }
    }
}
