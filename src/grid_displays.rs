use std::fmt;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;
use crate::grid_traits::GridDisplay;
use crate::pathing::Distances;
use crate::utils::FnvHashSet;


impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if let Some(d) = self.distance_from_start_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}


#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}


#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: GridCoordinate,
    end: GridCoordinate,
}
impl StartEndPointsDisplay {
    pub fn new(start: GridCoordinate, end: GridCoordinate) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if coord == self.start {
            String::from(" S ")
        } else if coord == self.end {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}


/// Junction glyphs indexed by the wall arms leaving a corner: left 8, right 4, up 2, down 1.
const JUNCTIONS: [&str; 16] = [" ", "╷", "╵", "│", "╶", "┌", "└", "├", "╴", "┐", "┘", "┤", "─",
                               "┬", "┴", "┼"];
const WALL_LR_3: &str = "───";
const WALL_UD: &str = "│";
const OPEN_3: &str = "   ";

impl Grid {
    /// Is there a wall on the `direction` side of the cell at signed `(row, column)`?
    /// Positions off the grid are open space, so only the grid boundary counts for them.
    fn is_wall(&self, row: isize, column: isize, direction: CompassPrimary) -> bool {
        let (row_delta, column_delta) = direction.offset();
        if self.within_bounds(row, column) {
            !self.has_passage(GridCoordinate::new(row as u32, column as u32), direction)
        } else {
            self.within_bounds(row + row_delta, column + column_delta)
        }
    }

    /// The glyph where the corners of cells `(row - 1, column - 1)` and `(row, column)` meet.
    fn junction(&self, row: isize, column: isize) -> &'static str {
        let left = self.is_wall(row - 1, column - 1, CompassPrimary::South);
        let right = self.is_wall(row - 1, column, CompassPrimary::South);
        let up = self.is_wall(row - 1, column - 1, CompassPrimary::East);
        let down = self.is_wall(row, column - 1, CompassPrimary::East);
        let arms = (left as usize) << 3 | (right as usize) << 2 | (up as usize) << 1 |
                   down as usize;
        JUNCTIONS[arms]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows = self.rows().0 as isize;
        let columns = self.columns().0 as isize;
        let mut output = String::new();

        for row in 0..(rows + 1) {
            // The wall line along the north side of `row`
            for column in 0..(columns + 1) {
                output.push_str(self.junction(row, column));
                if column < columns {
                    let wall = self.is_wall(row - 1, column, CompassPrimary::South);
                    output.push_str(if wall { WALL_LR_3 } else { OPEN_3 });
                }
            }
            output.push('\n');

            if row == rows {
                break;
            }

            // The cell bodies with the walls between them
            for column in 0..(columns + 1) {
                let wall = self.is_wall(row, column - 1, CompassPrimary::East);
                output.push_str(if wall { WALL_UD } else { " " });
                if column < columns {
                    let coord = GridCoordinate::new(row as u32, column as u32);
                    match *self.grid_display() {
                        Some(ref displayer) => {
                            output.push_str(&displayer.render_cell_body(coord))
                        }
                        None => output.push_str(OPEN_3),
                    }
                }
            }
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
