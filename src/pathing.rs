use smallvec::SmallVec;

use crate::cells::GridCoordinate;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};


/// Flood fill step counts from one start cell to every cell reachable through passages.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// None if `start_coordinate` is not on the grid.
    pub fn new(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max_distance = 0;
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, 0);

        // Passages are unweighted, so the first time a cell is reached is by a shortest route.
        // The distances map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let distance_to_cell = distances[cell_coord];
                max_distance = max_distance.max(distance_to_cell);

                let links = grid.links(*cell_coord).unwrap_or_default();
                for link_coord in links {
                    if !distances.contains_key(&link_coord) {
                        distances.insert(link_coord, distance_to_cell + 1);
                        new_frontier.push(link_coord);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None for cells that cannot be reached, or are not on the grid.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    pub fn furthest_points_on_grid(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .collect::<SmallVec<[GridCoordinate; 8]>>();
        furthest.sort();
        furthest
    }
}

/// The route from the distances' start cell to `end_point`, both included.
/// None if `end_point` cannot be reached.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Vec<GridCoordinate>> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut current_coord = end_point;
    let mut path = vec![end_point];

    // Walk back toward the start, always through a linked cell one step closer.
    while current_distance > 0 {
        let closer = grid.links(current_coord)?
            .into_iter()
            .find(|coord| {
                distances_from_start.distance_from_start_to(*coord) ==
                Some(current_distance - 1)
            })?;
        current_coord = closer;
        current_distance -= 1;
        path.push(current_coord);
    }

    path.reverse();
    Some(path)
}


#[cfg(test)]
mod tests {

    use std::u32;

    use super::*;
    use crate::cells::CompassPrimary;

    static OUT_OF_GRID_COORDINATE: GridCoordinate = GridCoordinate {
        row: u32::MAX,
        column: u32::MAX,
    };

    fn gc(row: u32, column: u32) -> GridCoordinate {
        GridCoordinate::new(row, column)
    }

    fn open_two_by_two() -> Grid {
        let mut g = Grid::new(2, 2).unwrap();
        g.open_passage(gc(0, 0), CompassPrimary::East);
        g.open_passage(gc(0, 0), CompassPrimary::South);
        g.open_passage(gc(0, 1), CompassPrimary::South);
        g.open_passage(gc(1, 0), CompassPrimary::East);
        g
    }

    #[test]
    fn distances_construction_requires_valid_start_coordinate() {
        let g = Grid::new(3, 3).unwrap();
        assert!(Distances::new(&g, OUT_OF_GRID_COORDINATE).is_none());
    }

    #[test]
    fn start() {
        let g = Grid::new(3, 3).unwrap();
        let distances = Distances::new(&g, gc(1, 1)).unwrap();
        assert_eq!(distances.start(), gc(1, 1));
    }

    #[test]
    fn distances_to_unreachable_cells_is_none() {
        let g = Grid::new(3, 3).unwrap();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        for coord in g.iter() {
            let d = distances.distance_from_start_to(coord);
            if coord == gc(0, 0) {
                assert_eq!(d, Some(0));
            } else {
                assert_eq!(d, None);
            }
        }
        assert_eq!(distances.reachable_count(), 1);
        assert_eq!(distances.distance_from_start_to(OUT_OF_GRID_COORDINATE), None);
    }

    #[test]
    fn distances_on_open_grid() {
        let g = open_two_by_two();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();

        assert_eq!(distances.distance_from_start_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(0, 1)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(1, 0)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), Some(2));
        assert_eq!(distances.max(), 2);
        assert_eq!(&*distances.furthest_points_on_grid(), &[gc(1, 1)]);
    }

    #[test]
    fn path_along_a_corridor() {
        let mut g = Grid::new(2, 3).unwrap();
        // (0,0) > (0,1) > (0,2) v (1,2) < (1,1) < (1,0)
        g.open_passage(gc(0, 0), CompassPrimary::East);
        g.open_passage(gc(0, 1), CompassPrimary::East);
        g.open_passage(gc(0, 2), CompassPrimary::South);
        g.open_passage(gc(1, 2), CompassPrimary::West);
        g.open_passage(gc(1, 1), CompassPrimary::West);

        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(shortest_path(&g, &distances, gc(1, 0)),
                   Some(vec![gc(0, 0), gc(0, 1), gc(0, 2), gc(1, 2), gc(1, 1), gc(1, 0)]));
        assert_eq!(shortest_path(&g, &distances, gc(0, 0)), Some(vec![gc(0, 0)]));
    }

    #[test]
    fn no_path_to_unreachable_cell() {
        let mut g = Grid::new(2, 2).unwrap();
        g.open_passage(gc(0, 0), CompassPrimary::East);
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(shortest_path(&g, &distances, gc(1, 1)), None);
        assert_eq!(shortest_path(&g, &distances, OUT_OF_GRID_COORDINATE), None);
    }
}
