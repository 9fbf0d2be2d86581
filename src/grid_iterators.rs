use crate::cells::CellCoordinate;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// Row-major iteration over every cell of a grid: rows ascending, then columns ascending.
///
/// Iterating in reverse visits rows descending, then columns descending.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    front_cell_number: usize,
    back_cell_number: usize,
    columns: usize,
}

impl CellIter {
    pub(crate) fn new(rows: RowsCount, columns: ColumnsCount) -> CellIter {
        CellIter {
            front_cell_number: 0,
            back_cell_number: rows.0 * columns.0,
            columns: columns.0,
        }
    }
}

impl Iterator for CellIter {
    type Item = CellCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front_cell_number < self.back_cell_number {
            let coord = CellCoordinate::from_row_major_index(self.front_cell_number, self.columns);
            self.front_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.back_cell_number - self.front_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

impl DoubleEndedIterator for CellIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front_cell_number < self.back_cell_number {
            self.back_cell_number -= 1;
            Some(CellCoordinate::from_row_major_index(self.back_cell_number, self.columns))
        } else {
            None
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()

/// Iterates a grid one row at a time, each row a batch of coordinates ordered by column.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    front_row: usize,
    back_row: usize,
    columns: usize,
}

impl RowIter {
    pub(crate) fn new(rows: RowsCount, columns: ColumnsCount) -> RowIter {
        RowIter {
            front_row: 0,
            back_row: rows.0,
            columns: columns.0,
        }
    }

    fn row_batch(&self, row: usize) -> Vec<CellCoordinate> {
        (0..self.columns)
            .map(|col| CellCoordinate::from_row_column_indices(RowIndex(row), ColumnIndex(col)))
            .collect()
    }
}

impl Iterator for RowIter {
    type Item = Vec<CellCoordinate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front_row < self.back_row {
            let batch = self.row_batch(self.front_row);
            self.front_row += 1;
            Some(batch)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.back_row - self.front_row;
        (lower_bound, Some(lower_bound))
    }
}

impl DoubleEndedIterator for RowIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front_row < self.back_row {
            self.back_row -= 1;
            Some(self.row_batch(self.back_row))
        } else {
            None
        }
    }
}

impl ExactSizeIterator for RowIter {}
