use bitflags::bitflags;
use smallvec::SmallVec;

use crate::units::ColumnsCount;

/// A cell position. Row 0 is the north edge, column 0 the west edge.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: u32,
    pub column: u32,
}

impl GridCoordinate {
    pub fn new(row: u32, column: u32) -> GridCoordinate {
        GridCoordinate { row, column }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, columns: ColumnsCount) -> GridCoordinate {
        let ColumnsCount(width) = columns;
        GridCoordinate::new((index / width) as u32, (index % width) as u32)
    }

    #[inline]
    pub fn to_row_major_index(self, columns: ColumnsCount) -> usize {
        self.row as usize * columns.0 + self.column as usize
    }

    /// The coordinate one cell away in `direction`.
    /// None if it is not representable, i.e. north of row 0 or west of column 0.
    /// The result is not checked against any grid's dimensions.
    pub fn offset(self, direction: CompassPrimary) -> Option<GridCoordinate> {
        let (row_delta, column_delta) = direction.offset();
        let row = offset_axis(self.row, row_delta)?;
        let column = offset_axis(self.column, column_delta)?;
        Some(GridCoordinate::new(row, column))
    }
}

impl From<(u32, u32)> for GridCoordinate {
    fn from(row_column_pair: (u32, u32)) -> GridCoordinate {
        GridCoordinate::new(row_column_pair.0, row_column_pair.1)
    }
}

#[inline]
fn offset_axis(value: u32, delta: isize) -> Option<u32> {
    match delta {
        -1 => value.checked_sub(1),
        1 => value.checked_add(1),
        _ => Some(value),
    }
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// The fixed enumeration order. The solver explores in this order.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    /// Unit `(row, column)` step.
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            CompassPrimary::North => (-1, 0),
            CompassPrimary::South => (1, 0),
            CompassPrimary::East => (0, 1),
            CompassPrimary::West => (0, -1),
        }
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// The single passage bit for this direction.
    #[inline]
    pub fn passage(self) -> Passages {
        match self {
            CompassPrimary::North => Passages::NORTH,
            CompassPrimary::South => Passages::SOUTH,
            CompassPrimary::East => Passages::EAST,
            CompassPrimary::West => Passages::WEST,
        }
    }
}

bitflags! {
    /// Open sides of a cell. A set bit means there is no wall toward that neighbour.
    pub struct Passages: u8 {
        const NORTH = 0b0001;
        const SOUTH = 0b0010;
        const EAST = 0b0100;
        const WEST = 0b1000;
    }
}

impl Passages {
    /// The directions that are open, in `CompassPrimary::ALL` order.
    pub fn directions(self) -> SmallVec<[CompassPrimary; 4]> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .filter(|dir| self.contains(dir.passage()))
            .collect()
    }
}

impl Default for Passages {
    fn default() -> Passages {
        Passages::empty()
    }
}
