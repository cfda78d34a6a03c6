//! Backtracking route finding from the entrance to the exit of a carved grid.
//!
//! The search is depth first, trying North, South, East then West from every cell. Each step
//! onto a cell and each retreat off a dead end is reported to a [`StepObserver`], in the order a
//! recursive search would make them, so a caller can animate or log the search as it happens.
//!
//! Visited marks are kept when the search backs out of a dead end. On a perfect maze that costs
//! nothing since there is only one simple route. On a grid with loops the search still returns a
//! simple route when one exists, just not necessarily the shortest.

use std::sync::mpsc::Sender;

use error_chain::bail;
use log::debug;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::errors::*;
use crate::grid::Grid;

/// Row-major cell indices from the first cell after the entrance up to and including the exit.
/// The entrance is never part of it, so a one cell maze has an empty path.
pub type Path = Vec<usize>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum StepKind {
    Forward,
    Backward,
}

/// One state change of a running search.
///
/// `path` is the route as it stands when the step is reported: a forward step's cell has just
/// been appended, a backward step's cell is still the last element and is removed right after.
#[derive(Debug)]
pub struct SolveStep<'a> {
    pub kind: StepKind,
    pub cell: usize,
    /// The direction taken from the previous cell into `cell`.
    pub direction: CompassPrimary,
    pub path: &'a [usize],
}

pub trait StepObserver {
    fn on_step(&mut self, step: &SolveStep);
}

impl<F> StepObserver for F
    where F: FnMut(&SolveStep)
{
    fn on_step(&mut self, step: &SolveStep) {
        self(step)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _: &SolveStep) {}
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct StepCounter {
    pub forward: usize,
    pub backward: usize,
}

impl StepObserver for StepCounter {
    fn on_step(&mut self, step: &SolveStep) {
        match step.kind {
            StepKind::Forward => self.forward += 1,
            StepKind::Backward => self.backward += 1,
        }
    }
}

/// Owned summary of a `SolveStep`, for handing to another thread.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct StepEvent {
    pub kind: StepKind,
    pub cell: usize,
    pub direction: CompassPrimary,
    pub path_length: usize,
}

/// Forwards every step over a channel, e.g. to a render loop.
/// Once the receiver hangs up further steps are dropped; the search itself carries on.
#[derive(Debug)]
pub struct ChannelObserver {
    sender: Sender<StepEvent>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<StepEvent>) -> ChannelObserver {
        ChannelObserver { sender }
    }
}

impl StepObserver for ChannelObserver {
    fn on_step(&mut self, step: &SolveStep) {
        let _ = self.sender.send(StepEvent {
            kind: step.kind,
            cell: step.cell,
            direction: step.direction,
            path_length: step.path.len(),
        });
    }
}

/// Find the route from the entrance to the exit.
pub fn solve(grid: &mut Grid) -> Result<Path> {
    solve_with_observer(grid, &mut NoopObserver)
}

/// Find the route from the entrance to the exit, reporting every step to `observer`.
///
/// All visited marks are reset first, then the entrance is marked so the search never walks back
/// into it. Only visited marks change; passages are left alone.
///
/// Returns `NotFound` when the exit cannot be reached, which a generated maze never causes.
/// Panics if the grid's passages are not symmetric.
pub fn solve_with_observer<O>(grid: &mut Grid, observer: &mut O) -> Result<Path>
    where O: StepObserver + ?Sized
{
    assert!(grid.is_passage_symmetric(), "corrupt grid: passages are not symmetric");

    grid.clear_all_visited();
    let entrance = grid.entrance();
    let exit_index = grid.cell_index(grid.exit());
    grid.mark_visited(entrance);

    let mut path = Path::new();
    if grid.cell_index(entrance) == exit_index {
        return Ok(path);
    }

    let mut stack = vec![SearchFrame::new(entrance, grid.cell_index(entrance), None)];
    let mut counter = StepCounter::default();

    loop {
        let (current, next_dir) = match stack.last_mut() {
            Some(frame) => (frame.coord, frame.next_direction()),
            None => {
                debug!("no route to the exit after {} forward steps", counter.forward);
                bail!(ErrorKind::NotFound);
            }
        };

        match next_dir {
            Some(dir) => {
                if !grid.has_passage(current, dir) {
                    continue;
                }
                let neighbour = match grid.neighbour_at_direction(current, dir) {
                    Some(coord) => coord,
                    None => unreachable!("symmetric passages never lead off the grid"),
                };
                if grid.is_visited(neighbour) {
                    continue;
                }

                grid.mark_visited(neighbour);
                let neighbour_index = grid.cell_index(neighbour);
                path.push(neighbour_index);
                report(observer,
                       &mut counter,
                       &SolveStep {
                           kind: StepKind::Forward,
                           cell: neighbour_index,
                           direction: dir,
                           path: &path,
                       });

                if neighbour_index == exit_index {
                    debug!("solved: path of {} cells, {} forward and {} backward steps",
                           path.len(),
                           counter.forward,
                           counter.backward);
                    return Ok(path);
                }
                stack.push(SearchFrame::new(neighbour, neighbour_index, Some(dir)));
            }
            None => {
                // Every direction tried: a dead end, unless this is the entrance giving up.
                let dead_end = stack.pop();
                if let Some(SearchFrame { index, entered_by: Some(dir), .. }) = dead_end {
                    report(observer,
                           &mut counter,
                           &SolveStep {
                               kind: StepKind::Backward,
                               cell: index,
                               direction: dir,
                               path: &path,
                           });
                    let _ = path.pop();
                }
            }
        }
    }
}

/// The full route as coordinates, entrance first.
pub fn path_coordinates(grid: &Grid, path: &[usize]) -> Vec<GridCoordinate> {
    let mut coords = Vec::with_capacity(path.len() + 1);
    coords.push(grid.entrance());
    coords.extend(path.iter().filter_map(|index| grid.index_to_grid_coordinate(*index)));
    coords
}

fn report<O>(observer: &mut O, counter: &mut StepCounter, step: &SolveStep)
    where O: StepObserver + ?Sized
{
    counter.on_step(step);
    observer.on_step(step);
}

#[derive(Debug)]
struct SearchFrame {
    coord: GridCoordinate,
    index: usize,
    entered_by: Option<CompassPrimary>,
    next: usize,
}

impl SearchFrame {
    fn new(coord: GridCoordinate, index: usize, entered_by: Option<CompassPrimary>) -> SearchFrame {
        SearchFrame {
            coord,
            index,
            entered_by,
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<CompassPrimary> {
        let dir = CompassPrimary::ALL.get(self.next).cloned();
        if dir.is_some() {
            self.next += 1;
        }
        dir
    }
}

#[cfg(test)]
mod tests {

    use std::sync::mpsc;

    use quickcheck::quickcheck;

    use super::*;
    use crate::cells::Passages;
    use crate::generators;
    use crate::pathing::{shortest_path, Distances};

    /// Records `(kind, cell, path length)` for every step.
    #[derive(Debug, Default)]
    struct StepLog(Vec<(StepKind, usize, usize)>);

    impl StepObserver for StepLog {
        fn on_step(&mut self, step: &SolveStep) {
            self.0.push((step.kind, step.cell, step.path.len()));
        }
    }

    fn gc(row: u32, column: u32) -> GridCoordinate {
        GridCoordinate::new(row, column)
    }

    fn generated(rows: usize, columns: usize, seed: u64) -> Grid {
        let mut g = Grid::new(rows, columns).unwrap();
        generators::generate(&mut g, seed);
        g
    }

    fn passages_snapshot(grid: &Grid) -> Vec<Passages> {
        grid.iter().map(|c| grid.passages(c).unwrap()).collect()
    }

    #[test]
    fn single_cell_is_already_solved() {
        let mut g = generated(1, 1, 42);
        let mut log = StepLog::default();
        let path = solve_with_observer(&mut g, &mut log).unwrap();
        assert!(path.is_empty());
        assert!(log.0.is_empty());
    }

    #[test]
    fn seeded_two_by_two_fixture() {
        let mut g = generated(2, 2, 42);
        let mut log = StepLog::default();
        let path = solve_with_observer(&mut g, &mut log).unwrap();
        assert_eq!(path, vec![2, 3]);
        assert_eq!(log.0, vec![(StepKind::Forward, 2, 1), (StepKind::Forward, 3, 2)]);
    }

    #[test]
    fn seeded_three_by_three_fixture_backtracks() {
        let mut g = generated(3, 3, 42);
        let mut log = StepLog::default();
        let path = solve_with_observer(&mut g, &mut log).unwrap();
        assert_eq!(path, vec![3, 4, 5, 8]);

        use crate::solving::StepKind::{Backward as B, Forward as F};
        assert_eq!(log.0,
                   vec![(F, 3, 1), (F, 4, 2), (F, 5, 3), (F, 2, 4), (F, 1, 5), (B, 1, 5),
                        (B, 2, 4), (F, 8, 4)]);
    }

    #[test]
    fn closures_observe_steps() {
        let mut g = generated(3, 3, 42);
        let mut steps = 0;
        let mut backward_cells = Vec::new();
        {
            let mut observer = |step: &SolveStep| {
                steps += 1;
                if step.kind == StepKind::Backward {
                    backward_cells.push(step.cell);
                }
            };
            let path = solve_with_observer(&mut g, &mut observer).unwrap();
            assert_eq!(path, vec![3, 4, 5, 8]);
        }
        assert_eq!(steps, 8);
        assert_eq!(backward_cells, vec![1, 2]);
    }

    #[test]
    fn hand_built_corridor() {
        let mut g = Grid::new(2, 2).unwrap();
        // (0,0) > (0,1) v (1,1), with (1,0) hanging off (1,1)
        g.open_passage(gc(0, 0), CompassPrimary::East);
        g.open_passage(gc(0, 1), CompassPrimary::South);
        g.open_passage(gc(1, 1), CompassPrimary::West);

        let path = solve(&mut g).unwrap();
        assert_eq!(path, vec![1, 3]);
        assert_eq!(path_coordinates(&g, &path), vec![gc(0, 0), gc(0, 1), gc(1, 1)]);
    }

    #[test]
    fn dead_ends_keep_their_visited_marks() {
        let mut g = Grid::new(2, 2).unwrap();
        // South first leads into a dead end at (1,0)
        g.open_passage(gc(0, 0), CompassPrimary::South);
        g.open_passage(gc(0, 0), CompassPrimary::East);
        g.open_passage(gc(0, 1), CompassPrimary::South);

        let mut counter = StepCounter::default();
        let path = solve_with_observer(&mut g, &mut counter).unwrap();
        assert_eq!(path, vec![1, 3]);
        assert_eq!(counter, StepCounter { forward: 3, backward: 1 });
        assert!(g.is_visited(gc(1, 0)));
        assert!(g.is_visited(gc(0, 0)));
    }

    #[test]
    fn unreachable_exit_is_not_found() {
        let mut g = Grid::new(2, 2).unwrap();
        g.open_passage(gc(0, 0), CompassPrimary::East);
        g.open_passage(gc(0, 0), CompassPrimary::South);

        let mut log = StepLog::default();
        match solve_with_observer(&mut g, &mut log) {
            Err(Error(ErrorKind::NotFound, _)) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert_eq!(log.0,
                   vec![(StepKind::Forward, 2, 1),
                        (StepKind::Backward, 2, 1),
                        (StepKind::Forward, 1, 1),
                        (StepKind::Backward, 1, 1)]);
    }

    #[test]
    fn walled_in_grid_is_not_found() {
        let mut g = Grid::new(3, 3).unwrap();
        assert!(solve(&mut g).is_err());
    }

    #[test]
    fn grid_with_loops_still_gets_a_simple_route() {
        let mut g = Grid::new(3, 3).unwrap();
        for coord in g.iter().collect::<Vec<_>>() {
            for dir in &[CompassPrimary::East, CompassPrimary::South] {
                if g.neighbour_at_direction(coord, *dir).is_some() {
                    g.open_passage(coord, *dir);
                }
            }
        }
        let path = solve(&mut g).unwrap();
        assert_eq!(path.last(), Some(&8));
        let mut unique = path.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), path.len());
        assert!(!path.contains(&0));
    }

    #[test]
    #[should_panic]
    fn asymmetric_grid_panics() {
        let mut g = Grid::new(1, 2).unwrap();
        g.open_passage(gc(0, 0), CompassPrimary::East);
        g.overwrite_passages(gc(0, 1), Passages::empty());
        let _ = solve(&mut g);
    }

    #[test]
    fn solving_twice_gives_the_same_path() {
        let mut g = generated(15, 20, 99);
        let first = solve(&mut g).unwrap();
        let second = solve(&mut g).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn channel_observer_forwards_steps() {
        let mut g = generated(3, 3, 42);
        let (sender, receiver) = mpsc::channel();
        let mut observer = ChannelObserver::new(sender);
        let path = solve_with_observer(&mut g, &mut observer).unwrap();
        drop(observer);

        let events = receiver.iter().collect::<Vec<StepEvent>>();
        assert_eq!(events.len(), 8);
        assert_eq!(events[0],
                   StepEvent {
                       kind: StepKind::Forward,
                       cell: 3,
                       direction: CompassPrimary::South,
                       path_length: 1,
                   });
        assert_eq!(events[5].kind, StepKind::Backward);
        assert_eq!(events[5].direction, CompassPrimary::West);
        assert_eq!(events.last().map(|e| e.path_length), Some(path.len()));
    }

    #[test]
    fn large_maze_does_not_exhaust_the_stack() {
        let mut g = generated(1, 200_000, 3);
        let path = solve(&mut g).unwrap();
        assert_eq!(path.len(), 199_999);
    }

    #[test]
    fn solver_agrees_with_breadth_first_oracle() {
        fn p(rows: u8, columns: u8, seed: u64) -> bool {
            let mut g = generated(rows as usize % 30 + 1, columns as usize % 30 + 1, seed);
            let before = passages_snapshot(&g);

            let mut counter = StepCounter::default();
            let path = solve_with_observer(&mut g, &mut counter).unwrap();

            let distances = Distances::new(&g, g.entrance()).unwrap();
            let oracle = shortest_path(&g, &distances, g.exit()).unwrap();

            path_coordinates(&g, &path) == oracle &&
            counter.forward - counter.backward == path.len() &&
            passages_snapshot(&g) == before && g.is_passage_symmetric()
        }
        quickcheck(p as fn(u8, u8, u64) -> bool);
    }
}
