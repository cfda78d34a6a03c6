//! **maze_backtracker** carves perfect mazes with a randomized depth-first walk and solves them
//! with a backtracking search whose every step can be observed.
//!
//! ```no_run
//! use maze_backtracker::{generators, grid::Grid, solving};
//!
//! let mut grid = Grid::new(24, 24).unwrap();
//! generators::generate(&mut grid, 42);
//! let path = solving::solve(&mut grid).unwrap();
//! println!("{}\n{} steps to the exit", grid, path.len());
//! ```

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_displays;
pub mod grid_iterators;
pub mod grid_traits;
pub mod pathing;
pub mod solving;
pub mod units;
mod utils;
