//! Recoverable failures of the maze core.
//!
//! Broken invariants (asymmetric passages, carving off the grid edge) are bugs and panic instead.

use error_chain::error_chain;

error_chain! {

    errors {
        // A grid needs at least one row and one column, and `rows * columns` must fit a `usize`.
        InvalidDimension(rows: usize, columns: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions: {} rows by {} columns", rows, columns)
        }

        // No route from the entrance to the exit. Never happens on a generated maze.
        NotFound {
            description("no path from entrance to exit")
            display("no path from the entrance to the exit")
        }
    }
}
