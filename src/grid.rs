use std::fmt;
use std::rc::Rc;

use bit_set::BitSet;
use petgraph::graph::{NodeIndex, UnGraph};
use smallvec::SmallVec;

use crate::cells::{CompassPrimary, CoordinateSmallVec, GridCoordinate, Passages};
use crate::errors::*;
use crate::grid_dimensions::RectGridDimensions;
use crate::grid_iterators::CellIter;
use crate::grid_traits::GridDisplay;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};


/// A rectangular maze grid.
///
/// Each cell holds a passage bitmask and a visited flag. Passages are always recorded on both
/// sides of a wall; `open_passage` is the only way to set them.
/// The entrance is the north west corner and the exit the south east corner.
pub struct Grid {
    dimensions: RectGridDimensions,
    cells: Vec<Passages>,
    visited: BitSet,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: rows: {:?}, columns: {:?}, links: {:?}",
               self.rows(), self.columns(), self.links_count())
    }
}

impl Grid {
    /// A grid with every wall standing and nothing visited.
    pub fn new(rows: usize, columns: usize) -> Result<Grid> {
        let dimensions = RectGridDimensions::new(RowsCount(rows), ColumnsCount(columns))
            .ok_or_else(|| Error::from(ErrorKind::InvalidDimension(rows, columns)))?;
        let NodesCount(cells_count) = dimensions.size();

        Ok(Grid {
            dimensions,
            cells: vec![Passages::empty(); cells_count],
            visited: BitSet::with_capacity(cells_count),
            grid_display: None,
        })
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    #[inline]
    pub fn dimensions(&self) -> &RectGridDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    #[inline]
    pub fn entrance(&self) -> GridCoordinate {
        GridCoordinate::new(0, 0)
    }

    #[inline]
    pub fn exit(&self) -> GridCoordinate {
        GridCoordinate::new(self.rows().0 as u32 - 1, self.columns().0 as u32 - 1)
    }

    #[inline]
    pub fn within_bounds(&self, row: isize, column: isize) -> bool {
        self.dimensions.within_bounds(row, column)
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        self.dimensions.is_valid_coordinate(coord)
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        self.dimensions.grid_coordinate_to_index(coord)
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Option<GridCoordinate> {
        self.dimensions.index_to_grid_coordinate(index)
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        coord.offset(direction).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// Cells to the North, South, East or West, whether or not a passage leads there.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Open passage bits of a cell. None for a coordinate off the grid.
    #[inline]
    pub fn passages(&self, coord: GridCoordinate) -> Option<Passages> {
        self.grid_coordinate_to_index(coord).map(|index| self.cells[index])
    }

    #[inline]
    pub fn has_passage(&self, coord: GridCoordinate, direction: CompassPrimary) -> bool {
        self.passages(coord).map_or(false, |p| p.contains(direction.passage()))
    }

    /// Knock down the wall between `coord` and its neighbour in `direction`, on both sides.
    ///
    /// Panics if either cell is off the grid. Callers are expected to have checked bounds.
    pub fn open_passage(&mut self, coord: GridCoordinate, direction: CompassPrimary) {
        let index = self.cell_index(coord);
        let neighbour = self.neighbour_at_direction(coord, direction)
            .unwrap_or_else(|| {
                panic!("no neighbour {:?} of {:?} to open a passage to", direction, coord)
            });
        let neighbour_index = self.cell_index(neighbour);

        self.cells[index].insert(direction.passage());
        self.cells[neighbour_index].insert(direction.opposite().passage());
    }

    /// Cells that are linked to `coord` by a passage.
    pub fn links(&self, coord: GridCoordinate) -> Option<CoordinateSmallVec> {
        self.passages(coord).map(|passages| {
            passages.directions()
                .into_iter()
                .filter_map(|dir| self.neighbour_at_direction(coord, dir))
                .collect()
        })
    }

    /// Number of open passages, each counted once.
    pub fn links_count(&self) -> usize {
        let open_sides: usize = self.cells.iter().map(|p| p.bits().count_ones() as usize).sum();
        open_sides / 2
    }

    #[inline]
    pub fn is_visited(&self, coord: GridCoordinate) -> bool {
        self.visited.contains(self.cell_index(coord))
    }

    #[inline]
    pub fn mark_visited(&mut self, coord: GridCoordinate) {
        let index = self.cell_index(coord);
        self.visited.insert(index);
    }

    #[inline]
    pub fn clear_visited(&mut self, coord: GridCoordinate) {
        let index = self.cell_index(coord);
        self.visited.remove(index);
    }

    pub fn clear_all_visited(&mut self) {
        self.visited.clear();
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.dimensions)
    }

    pub fn iter_links(&self) -> LinksIter<'_> {
        LinksIter {
            grid: self,
            cells: self.iter(),
            pending: SmallVec::new(),
        }
    }

    /// Every open passage bit has its matching bit on the neighbour, and no passage leads off
    /// the grid.
    pub fn is_passage_symmetric(&self) -> bool {
        self.iter().all(|coord| {
            let passages = self.cells[self.cell_index(coord)];
            passages.directions().into_iter().all(|dir| {
                self.neighbour_at_direction(coord, dir)
                    .map_or(false, |neighbour| self.has_passage(neighbour, dir.opposite()))
            })
        })
    }

    /// The passages as an undirected graph, node `i` being the cell at row-major index `i`.
    pub fn as_graph(&self) -> UnGraph<(), ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.dimensions.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges);
        for _ in 0..nodes {
            let _ = graph.add_node(());
        }
        for (a, b) in self.iter_links() {
            let a_index = self.cell_index(a);
            let b_index = self.cell_index(b);
            let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
        }
        graph
    }

    /// Replace a cell's passages without touching its neighbours, to build corrupt grids.
    #[cfg(test)]
    pub(crate) fn overwrite_passages(&mut self, coord: GridCoordinate, passages: Passages) {
        let index = self.cell_index(coord);
        self.cells[index] = passages;
    }

    /// Row-major index of a coordinate that must be on the grid.
    #[inline]
    pub(crate) fn cell_index(&self, coord: GridCoordinate) -> usize {
        self.grid_coordinate_to_index(coord)
            .unwrap_or_else(|| panic!("{:?} is outside the grid {:?}", coord, self.dimensions))
    }
}

/// Iterates each open passage once as `(cell, neighbour)`, the neighbour being to the south or
/// east of the cell.
pub struct LinksIter<'a> {
    grid: &'a Grid,
    cells: CellIter,
    pending: SmallVec<[(GridCoordinate, GridCoordinate); 2]>,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (GridCoordinate, GridCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(link) = self.pending.pop() {
                return Some(link);
            }
            let coord = self.cells.next()?;

            // Popped in reverse, so south links come out before east links.
            for dir in &[CompassPrimary::East, CompassPrimary::South] {
                if self.grid.has_passage(coord, *dir) {
                    if let Some(neighbour) = self.grid.neighbour_at_direction(coord, *dir) {
                        self.pending.push((coord, neighbour));
                    }
                }
            }
        }
    }
}

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: cells iter : {:?}", self.cells)
    }
}
