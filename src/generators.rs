use bit_set::BitSet;
use log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use smallvec::SmallVec;

use crate::cells::{CellCoordinate, CellState};
use crate::errors::*;
use crate::grid::OccupancyGrid;
use crate::grid_dimensions::MazeDimensions;
use crate::pathing::open_components;

/// Anything that can produce a fresh occupancy grid for a build request.
///
/// Every grid returned must have at least one open cell and all of its open cells must form
/// one region under 4-directional adjacency.
pub trait GridGenerator {
    fn generate(&mut self, dimensions: MazeDimensions) -> Result<OccupancyGrid>;
}

impl<G: GridGenerator + ?Sized> GridGenerator for Box<G> {
    fn generate(&mut self, dimensions: MazeDimensions) -> Result<OccupancyGrid> {
        (**self).generate(dimensions)
    }
}

/// The cells carving treats as rooms: every odd index inside the outer ring of a grid.
/// Carving connects rooms by opening the single cell between two neighbouring rooms, so the
/// outer ring and the cells at even/even indices stay blocked.
///
/// Grids that are only 1 or 2 cells across have no inner ring on that axis and use index 0.
#[derive(Debug, Clone)]
struct RoomLattice {
    row_indices: Vec<usize>,
    column_indices: Vec<usize>,
}

type LatticeSmallVec = SmallVec<[(usize, usize); 4]>;

impl RoomLattice {
    fn new(dimensions: MazeDimensions) -> RoomLattice {
        RoomLattice {
            row_indices: RoomLattice::axis_indices(dimensions.rows().0),
            column_indices: RoomLattice::axis_indices(dimensions.columns().0),
        }
    }

    fn axis_indices(cells_across: usize) -> Vec<usize> {
        if cells_across < 3 {
            vec![0]
        } else {
            (1..cells_across - 1).step_by(2).collect()
        }
    }

    fn rows(&self) -> usize {
        self.row_indices.len()
    }

    fn columns(&self) -> usize {
        self.column_indices.len()
    }

    fn size(&self) -> usize {
        self.rows() * self.columns()
    }

    fn index(&self, room: (usize, usize)) -> usize {
        room.0 * self.columns() + room.1
    }

    fn room_at_index(&self, index: usize) -> (usize, usize) {
        (index / self.columns(), index % self.columns())
    }

    fn cell(&self, room: (usize, usize)) -> CellCoordinate {
        CellCoordinate::new(self.row_indices[room.0], self.column_indices[room.1])
    }

    /// The grid cell separating two orthogonally adjacent rooms.
    fn passage_between(&self, a: (usize, usize), b: (usize, usize)) -> CellCoordinate {
        let (cell_a, cell_b) = (self.cell(a), self.cell(b));
        CellCoordinate::new((cell_a.row + cell_b.row) / 2,
                            (cell_a.col + cell_b.col) / 2)
    }

    fn neighbours(&self, room: (usize, usize)) -> LatticeSmallVec {
        let (row, col) = room;
        let mut neighbours = LatticeSmallVec::new();
        if row > 0 {
            neighbours.push((row - 1, col));
        }
        if col + 1 < self.columns() {
            neighbours.push((row, col + 1));
        }
        if col > 0 {
            neighbours.push((row, col - 1));
        }
        if row + 1 < self.rows() {
            neighbours.push((row + 1, col));
        }
        neighbours
    }

    fn random_room<R: Rng>(&self, rng: &mut R) -> (usize, usize) {
        self.room_at_index(rng.gen_range(0..self.size()))
    }

    fn open_room(&self, grid: &mut OccupancyGrid, room: (usize, usize)) {
        grid.set(self.cell(room), CellState::Open);
    }

    fn carve(&self, grid: &mut OccupancyGrid, from: (usize, usize), to: (usize, usize)) {
        grid.set(self.passage_between(from, to), CellState::Open);
        self.open_room(grid, to);
    }
}

/// Depth first carving with an explicit stack.
///
/// Starting from a random room, it keeps walking to a random unvisited neighbour room, knocking
/// through the wall between them. When it's stuck it backs up along the walk until it finds a
/// room with an unvisited neighbour. The result is a perfect maze with long winding corridors.
#[derive(Debug, Clone)]
pub struct RecursiveBacktracker<R = XorShiftRng> {
    rng: R,
}

impl RecursiveBacktracker<XorShiftRng> {
    pub fn from_seed(seed: u64) -> Self {
        RecursiveBacktracker::with_rng(XorShiftRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RecursiveBacktracker::from_seed(rand::random())
    }
}

impl<R: Rng> RecursiveBacktracker<R> {
    pub fn with_rng(rng: R) -> Self {
        RecursiveBacktracker { rng }
    }
}

impl<R: Rng> GridGenerator for RecursiveBacktracker<R> {
    fn generate(&mut self, dimensions: MazeDimensions) -> Result<OccupancyGrid> {
        let lattice = RoomLattice::new(dimensions);
        let mut grid = OccupancyGrid::blocked(dimensions);
        let mut visited = BitSet::with_capacity(lattice.size());

        let start_room = lattice.random_room(&mut self.rng);
        lattice.open_room(&mut grid, start_room);
        visited.insert(lattice.index(start_room));

        let mut stack = vec![start_room];
        while let Some(&room) = stack.last() {
            let unvisited: LatticeSmallVec = lattice.neighbours(room)
                .into_iter()
                .filter(|neighbour| !visited.contains(lattice.index(*neighbour)))
                .collect();

            match unvisited.choose(&mut self.rng) {
                Some(&next_room) => {
                    lattice.carve(&mut grid, room, next_room);
                    visited.insert(lattice.index(next_room));
                    stack.push(next_room);
                }
                None => {
                    stack.pop();
                }
            }
        }

        debug!("recursive backtracker carved {} open cells in a {} grid",
               grid.open_cells_count(),
               dimensions);
        Ok(grid)
    }
}

/// Frontier based carving.
///
/// Keeps a set of candidate passages leading out of the carved region and opens a random one at
/// a time. Compared with the backtracker it grows outwards from the start room and gives many
/// short dead ends.
#[derive(Debug, Clone)]
pub struct RandomizedPrim<R = XorShiftRng> {
    rng: R,
}

impl RandomizedPrim<XorShiftRng> {
    pub fn from_seed(seed: u64) -> Self {
        RandomizedPrim::with_rng(XorShiftRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RandomizedPrim::from_seed(rand::random())
    }
}

impl<R: Rng> RandomizedPrim<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomizedPrim { rng }
    }
}

impl<R: Rng> GridGenerator for RandomizedPrim<R> {
    fn generate(&mut self, dimensions: MazeDimensions) -> Result<OccupancyGrid> {
        let lattice = RoomLattice::new(dimensions);
        let mut grid = OccupancyGrid::blocked(dimensions);
        let mut visited = BitSet::with_capacity(lattice.size());

        let start_room = lattice.random_room(&mut self.rng);
        lattice.open_room(&mut grid, start_room);
        visited.insert(lattice.index(start_room));

        let mut frontier: Vec<((usize, usize), (usize, usize))> =
            lattice.neighbours(start_room).into_iter().map(|n| (start_room, n)).collect();

        while !frontier.is_empty() {
            let pick = self.rng.gen_range(0..frontier.len());
            let (from, to) = frontier.swap_remove(pick);
            if visited.contains(lattice.index(to)) {
                continue;
            }

            lattice.carve(&mut grid, from, to);
            visited.insert(lattice.index(to));
            frontier.extend(lattice.neighbours(to)
                .into_iter()
                .filter(|neighbour| !visited.contains(lattice.index(*neighbour)))
                .map(|neighbour| (to, neighbour)));
        }

        debug!("randomized prim carved {} open cells in a {} grid",
               grid.open_cells_count(),
               dimensions);
        Ok(grid)
    }
}

/// Replays one authored grid for every build request of matching dimensions.
#[derive(Debug, Clone)]
pub struct FixedLayout {
    layout: OccupancyGrid,
}

impl FixedLayout {
    /// Rejects layouts without any open cell, or whose open cells are not one region.
    pub fn new(layout: OccupancyGrid) -> Result<FixedLayout> {
        match open_components(&layout) {
            0 => bail!(ErrorKind::EmptyGrid),
            1 => Ok(FixedLayout { layout }),
            components => bail!(ErrorKind::DisconnectedGrid(components)),
        }
    }

    pub fn layout(&self) -> &OccupancyGrid {
        &self.layout
    }
}

impl GridGenerator for FixedLayout {
    fn generate(&mut self, dimensions: MazeDimensions) -> Result<OccupancyGrid> {
        let layout_dimensions = self.layout.dimensions();
        if layout_dimensions != dimensions {
            bail!(ErrorKind::LayoutMismatch((dimensions.rows().0, dimensions.columns().0),
                                            (layout_dimensions.rows().0,
                                             layout_dimensions.columns().0)));
        }
        Ok(self.layout.clone())
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::pathing::is_fully_connected;
    use crate::units::{ColumnsCount, RowsCount};

    fn dims(r: usize, c: usize) -> MazeDimensions {
        MazeDimensions::new(RowsCount(r), ColumnsCount(c)).unwrap()
    }

    #[test]
    fn lattice_axis_indices() {
        assert_eq!(RoomLattice::axis_indices(1), vec![0]);
        assert_eq!(RoomLattice::axis_indices(2), vec![0]);
        assert_eq!(RoomLattice::axis_indices(3), vec![1]);
        assert_eq!(RoomLattice::axis_indices(4), vec![1]);
        assert_eq!(RoomLattice::axis_indices(7), vec![1, 3, 5]);
        assert_eq!(RoomLattice::axis_indices(8), vec![1, 3, 5]);
    }

    #[test]
    fn backtracker_makes_a_perfect_maze_on_odd_grids() {
        let mut generator = RecursiveBacktracker::from_seed(7);
        let grid = generator.generate(dims(13, 15)).unwrap();

        // 6 x 7 rooms joined by a spanning tree of 41 passages
        assert_eq!(grid.open_cells_count(), 42 + 41);
        assert!(is_fully_connected(&grid));

        // outer ring stays solid
        for coord in grid.iter() {
            if coord.row == 0 || coord.col == 0 || coord.row == 12 || coord.col == 14 {
                assert!(!grid.is_open(coord));
            }
        }
    }

    #[test]
    fn prim_makes_a_perfect_maze_on_odd_grids() {
        let mut generator = RandomizedPrim::from_seed(7);
        let grid = generator.generate(dims(13, 15)).unwrap();
        assert_eq!(grid.open_cells_count(), 42 + 41);
        assert!(is_fully_connected(&grid));
    }

    #[test]
    fn tiny_grids_still_have_an_open_cell() {
        let mut generator = RecursiveBacktracker::from_seed(1);
        let single = generator.generate(dims(1, 1)).unwrap();
        assert_eq!(single.open_cells_count(), 1);
        assert!(single.is_open(CellCoordinate::new(0, 0)));

        let pair = generator.generate(dims(2, 2)).unwrap();
        assert_eq!(pair.iter_open().collect::<Vec<_>>(), vec![CellCoordinate::new(0, 0)]);

        let strip = generator.generate(dims(1, 5)).unwrap();
        assert_eq!(strip.to_string(), "==............==\n");
    }

    #[test]
    fn seeded_generators_are_deterministic() {
        let a = RecursiveBacktracker::from_seed(42).generate(dims(21, 31)).unwrap();
        let b = RecursiveBacktracker::from_seed(42).generate(dims(21, 31)).unwrap();
        assert_eq!(a, b);

        let c = RandomizedPrim::from_seed(42).generate(dims(21, 31)).unwrap();
        let d = RandomizedPrim::from_seed(42).generate(dims(21, 31)).unwrap();
        assert_eq!(c, d);
    }

    #[test]
    fn boxed_generators_generate() {
        let mut generator: Box<dyn GridGenerator> = Box::new(RandomizedPrim::from_seed(3));
        let grid = generator.generate(dims(5, 5)).unwrap();
        assert!(is_fully_connected(&grid));
    }

    #[test]
    fn generated_grids_are_connected() {
        fn connected(generator_choice: bool, rows: u8, columns: u8, seed: u64) -> TestResult {
            let (rows, columns) = (rows as usize % 40, columns as usize % 40);
            if rows == 0 || columns == 0 {
                return TestResult::discard();
            }

            let mut generator: Box<dyn GridGenerator> = if generator_choice {
                Box::new(RecursiveBacktracker::from_seed(seed))
            } else {
                Box::new(RandomizedPrim::from_seed(seed))
            };
            let grid = generator.generate(dims(rows, columns)).unwrap();
            TestResult::from_bool(grid.open_cells_count() > 0 && is_fully_connected(&grid))
        }
        quickcheck(connected as fn(bool, u8, u8, u64) -> TestResult);
    }

    #[test]
    fn fixed_layout_validation() {
        let disconnected = OccupancyGrid::parse(".#.").unwrap();
        match FixedLayout::new(disconnected) {
            Err(Error(ErrorKind::DisconnectedGrid(2), _)) => (),
            other => panic!("expected disconnected grid, got {:?}", other),
        }

        let solid = OccupancyGrid::parse("###").unwrap();
        match FixedLayout::new(solid) {
            Err(Error(ErrorKind::EmptyGrid, _)) => (),
            other => panic!("expected empty grid, got {:?}", other),
        }
    }

    #[test]
    fn fixed_layout_replays_matching_requests_only() {
        let layout = OccupancyGrid::parse("
            ###
            #..
            ###
        ").unwrap();
        let mut generator = FixedLayout::new(layout.clone()).unwrap();
        assert_eq!(generator.generate(dims(3, 3)).unwrap(), layout);
        assert_eq!(generator.layout(), &layout);

        match generator.generate(dims(3, 5)) {
            Err(Error(ErrorKind::LayoutMismatch((3, 5), (3, 3)), _)) => (),
            other => panic!("expected layout mismatch, got {:?}", other),
        }
    }
}
