use crate::cells::GridCoordinate;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};


#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RectGridDimensions {
    rows: RowsCount,
    columns: ColumnsCount,
}

impl RectGridDimensions {
    /// None if either side is zero, a side does not fit a `u32` coordinate or the cell
    /// count overflows `usize`.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Option<RectGridDimensions> {
        let (RowsCount(r), ColumnsCount(c)) = (rows, columns);
        let coordinate_limit = u32::MAX as usize;

        if r == 0 || c == 0 || r > coordinate_limit || c > coordinate_limit {
            return None;
        }
        r.checked_mul(c).map(|_| RectGridDimensions { rows, columns })
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.rows.0 * self.columns.0)
    }

    #[inline(always)]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline(always)]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Node count and the number of adjacent cell pairs, i.e. the most passages the grid can hold.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let (RowsCount(r), ColumnsCount(c)) = (self.rows, self.columns);
        let horizontal_pairs = r * (c - 1);
        let vertical_pairs = c * (r - 1);
        (self.size(), EdgesCount(horizontal_pairs + vertical_pairs))
    }

    /// Signed so that neighbour arithmetic past the north or west edge can be asked about directly.
    #[inline]
    pub fn within_bounds(&self, row: isize, column: isize) -> bool {
        row >= 0 && column >= 0 && (row as usize) < self.rows.0 &&
        (column as usize) < self.columns.0
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.row as usize) < self.rows.0 && (coord.column as usize) < self.columns.0
    }

    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.to_row_major_index(self.columns))
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Option<GridCoordinate> {
        if index < self.size().0 {
            Some(GridCoordinate::from_row_major_index(index, self.columns))
        } else {
            None
        }
    }
}
