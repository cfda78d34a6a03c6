use bit_set::BitSet;
use log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;

/// Carve a perfect maze into `grid` with a randomly seeded generator.
pub fn recursive_backtracker(grid: &mut Grid) {
    let mut rng = rand::thread_rng();
    generate_with_rng(grid, &mut rng);
}

/// Carve a perfect maze into `grid`. The same seed and grid size always give the same maze.
pub fn generate(grid: &mut Grid, seed: u64) {
    let mut rng = XorShiftRng::seed_from_u64(seed);
    generate_with_rng(grid, &mut rng);
}

/// Apply the recursive backtracker maze generation algorithm to a grid.
///
/// Starting from the entrance, a random walk carves into cells that have not been carved yet,
/// backing up to the most recent cell with an uncarved neighbour whenever it gets stuck. Every
/// cell is reached exactly once, so the passages form a spanning tree: a perfect maze.
///
/// The walk keeps its own stack of frames rather than recursing, so the grid size is not bounded
/// by the thread's stack. Randomness is consumed as the recursive form would: one shuffle of the
/// four directions each time a cell is entered.
///
/// Panics if the grid already has passages.
pub fn generate_with_rng<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    assert_eq!(grid.links_count(), 0, "maze generation requires a grid with no passages");

    let start = grid.entrance();
    let mut carved = BitSet::with_capacity(grid.size());
    carved.insert(grid.cell_index(start));

    let mut stack = vec![CarveFrame::new(start, rng)];
    let mut deepest = stack.len();

    loop {
        let (current, next_dir) = match stack.last_mut() {
            Some(frame) => (frame.coord, frame.next_direction()),
            None => break,
        };

        match next_dir {
            Some(dir) => {
                if let Some(neighbour) = grid.neighbour_at_direction(current, dir) {
                    // `insert` is false for a cell that was carved already
                    if carved.insert(grid.cell_index(neighbour)) {
                        grid.open_passage(current, dir);
                        stack.push(CarveFrame::new(neighbour, rng));
                        deepest = deepest.max(stack.len());
                    }
                }
            }
            None => {
                let _ = stack.pop();
            }
        }
    }

    debug!("carved {} passages over {} cells, deepest walk {} cells",
           grid.links_count(),
           grid.size(),
           deepest);
}

#[derive(Debug)]
struct CarveFrame {
    coord: GridCoordinate,
    directions: [CompassPrimary; 4],
    next: usize,
}

impl CarveFrame {
    fn new<R: Rng + ?Sized>(coord: GridCoordinate, rng: &mut R) -> CarveFrame {
        let mut directions = CompassPrimary::ALL;
        directions.shuffle(rng);
        CarveFrame {
            coord,
            directions,
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<CompassPrimary> {
        let dir = self.directions.get(self.next).cloned();
        if dir.is_some() {
            self.next += 1;
        }
        dir
    }
}
