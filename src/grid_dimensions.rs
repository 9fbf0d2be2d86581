use std::fmt;

use crate::errors::*;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

/// Validated row and column counts of a maze build request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MazeDimensions {
    rows: RowsCount,
    columns: ColumnsCount,
}

/// Non fatal diagnostic: carving alternates passages and walls, which only lines up cleanly
/// with the grid edges when both dimensions are odd.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct InvalidDimensionsWarning {
    pub rows: RowsCount,
    pub columns: ColumnsCount,
}

impl fmt::Display for InvalidDimensionsWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "{}x{} maze requested, odd numbers work better for maze dimensions",
               self.rows.0,
               self.columns.0)
    }
}

impl MazeDimensions {
    /// Rejects zero sized dimensions, and dimensions whose cell count does not fit a `usize`.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<MazeDimensions> {
        let (RowsCount(r), ColumnsCount(c)) = (rows, columns);
        if r == 0 || c == 0 || r.checked_mul(c).is_none() {
            bail!(ErrorKind::DegenerateBounds(r, c));
        }
        Ok(MazeDimensions { rows, columns })
    }

    #[inline(always)]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline(always)]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.rows.0 * self.columns.0)
    }

    /// Capacity hints for a graph with one node per cell and one edge per pair of
    /// horizontally or vertically adjacent cells.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let (RowsCount(r), ColumnsCount(c)) = (self.rows, self.columns);
        let edges = r * c.saturating_sub(1) + c * r.saturating_sub(1);
        (self.size(), EdgesCount(edges))
    }

    /// Warns when either dimension is even, not only when both are. A single even side already
    /// leaves the room lattice one cell short of the border on that side.
    pub fn dimension_warning(&self) -> Option<InvalidDimensionsWarning> {
        let is_even = |n: usize| n % 2 == 0;
        if is_even(self.rows.0) || is_even(self.columns.0) {
            Some(InvalidDimensionsWarning {
                rows: self.rows,
                columns: self.columns,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for MazeDimensions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.rows.0, self.columns.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(r: usize, c: usize) -> Result<MazeDimensions> {
        MazeDimensions::new(RowsCount(r), ColumnsCount(c))
    }

    #[test]
    fn zero_dimensions_are_degenerate() {
        for &(r, c) in &[(0, 5), (5, 0), (0, 0)] {
            match dims(r, c) {
                Err(Error(ErrorKind::DegenerateBounds(er, ec), _)) => {
                    assert_eq!((er, ec), (r, c));
                }
                other => panic!("expected degenerate bounds, got {:?}", other),
            }
        }
    }

    #[test]
    fn overflowing_cell_count_is_degenerate() {
        assert!(dims(usize::MAX, 2).is_err());
    }

    #[test]
    fn odd_dimensions_have_no_warning() {
        let d = dims(13, 15).unwrap();
        assert_eq!(d.dimension_warning(), None);
        assert_eq!(d.size(), NodesCount(195));
    }

    #[test]
    fn even_dimensions_warn() {
        let d = dims(4, 6).unwrap();
        assert_eq!(d.dimension_warning(),
                   Some(InvalidDimensionsWarning {
                       rows: RowsCount(4),
                       columns: ColumnsCount(6),
                   }));
        assert!(dims(13, 6).unwrap().dimension_warning().is_some());
        assert!(dims(4, 15).unwrap().dimension_warning().is_some());
    }

    #[test]
    fn graph_size_counts_adjacent_pairs() {
        assert_eq!(dims(1, 1).unwrap().graph_size(), (NodesCount(1), EdgesCount(0)));
        assert_eq!(dims(2, 3).unwrap().graph_size(), (NodesCount(6), EdgesCount(7)));
    }
}
