use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use smallvec::SmallVec;

use crate::cells::{CellCoordinate, CompassPrimary};
use crate::grid::OccupancyGrid;
use crate::units::{EdgesCount, NodesCount};
use crate::utils::{fnv_hashmap, FnvHashMap};

/// Step counts from one open cell to every open cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: CellCoordinate,
    distances: FnvHashMap<CellCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// Flood fill from `start_coordinate` through open cells.
    /// Returns None if the start is not an open cell of the grid.
    pub fn new(grid: &OccupancyGrid, start_coordinate: CellCoordinate) -> Option<Distances> {
        if !grid.is_open(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = fnv_hashmap(grid.open_cells_count());
        distances.insert(start_coordinate, 0);

        // Every step costs one, so the first time a cell is reached is the shortest distance
        // to it and the distances map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {
            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for neighbour_coord in grid.open_neighbours(*cell_coord) {
                    if !distances.contains_key(&neighbour_coord) {
                        distances.insert(neighbour_coord, distance_to_cell + 1);
                        new_frontier.push(neighbour_coord);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> CellCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None if the coordinate is unreachable from the start.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: CellCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// Cells at the maximum distance from the start, in row-major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[CellCoordinate; 8]> {
        let furthest_distance = self.max();
        let mut furthest: SmallVec<[CellCoordinate; 8]> = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .collect();
        furthest.sort();
        furthest
    }
}

/// Walks back from `end_point` to the start of `distances_from_start`, always stepping to an
/// adjacent open cell one closer to the start.
/// Returns None if the end point is unreachable.
pub fn shortest_path(grid: &OccupancyGrid,
                     distances_from_start: &Distances,
                     end_point: CellCoordinate)
                     -> Option<Vec<CellCoordinate>> {
    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut current_coord = end_point;
    let mut path = Vec::with_capacity(current_distance as usize + 1);
    path.push(end_point);

    while current_distance > 0 {
        let closer = grid.open_neighbours(current_coord)
            .into_iter()
            .find(|neighbour_coord| {
                distances_from_start.distance_from_start_to(*neighbour_coord) ==
                Some(current_distance - 1)
            })?;
        current_coord = closer;
        current_distance -= 1;
        path.push(current_coord);
    }

    path.reverse();
    Some(path)
}

/// Graph with one node per open cell and an edge between each pair of adjacent open cells.
pub fn open_cell_graph(grid: &OccupancyGrid) -> UnGraph<CellCoordinate, ()> {
    let (NodesCount(nodes_hint), EdgesCount(edges_hint)) = grid.dimensions().graph_size();
    let mut graph = UnGraph::with_capacity(nodes_hint, edges_hint);
    let mut node_indices: FnvHashMap<CellCoordinate, NodeIndex> = fnv_hashmap(nodes_hint);

    for coord in grid.iter_open() {
        node_indices.insert(coord, graph.add_node(coord));
    }

    // Only looking east and south visits each adjacent pair once.
    for coord in grid.iter_open() {
        for dir in &[CompassPrimary::East, CompassPrimary::South] {
            if let Some(neighbour_coord) = grid.neighbour_at_direction(coord, *dir) {
                if let Some(neighbour_index) = node_indices.get(&neighbour_coord) {
                    graph.add_edge(node_indices[&coord], *neighbour_index, ());
                }
            }
        }
    }

    graph
}

/// Number of separate regions of open cells under 4-directional adjacency.
pub fn open_components(grid: &OccupancyGrid) -> usize {
    connected_components(&open_cell_graph(grid))
}

/// True iff there is at least one open cell and every open cell can reach every other.
pub fn is_fully_connected(grid: &OccupancyGrid) -> bool {
    open_components(grid) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gc(row: usize, col: usize) -> CellCoordinate {
        CellCoordinate::new(row, col)
    }

    fn corridor_grid() -> OccupancyGrid {
        OccupancyGrid::parse("
            ....
            ##.#
            ...#
        ").unwrap()
    }

    #[test]
    fn distances_construction_requires_open_start() {
        let g = corridor_grid();
        assert!(Distances::new(&g, gc(1, 0)).is_none());
        assert!(Distances::new(&g, gc(9, 9)).is_none());
        assert!(Distances::new(&g, gc(0, 0)).is_some());
    }

    #[test]
    fn distances_follow_corridors() {
        let g = corridor_grid();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.start(), gc(0, 0));
        assert_eq!(distances.distance_from_start_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(0, 3)), Some(3));
        assert_eq!(distances.distance_from_start_to(gc(1, 2)), Some(3));
        assert_eq!(distances.distance_from_start_to(gc(2, 0)), Some(6));
        assert_eq!(distances.distance_from_start_to(gc(1, 0)), None);
        assert_eq!(distances.max(), 6);
        assert_eq!(&*distances.furthest_points_on_grid(), &[gc(2, 0)]);
        assert_eq!(distances.reachable_count(), g.open_cells_count());
    }

    #[test]
    fn unreachable_cells_have_no_distance() {
        let g = OccupancyGrid::parse(".#.").unwrap();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.distance_from_start_to(gc(0, 2)), None);
        assert_eq!(shortest_path(&g, &distances, gc(0, 2)), None);
    }

    #[test]
    fn shortest_path_between_corners() {
        let g = corridor_grid();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        let path = shortest_path(&g, &distances, gc(2, 0)).unwrap();
        assert_eq!(path,
                   vec![gc(0, 0), gc(0, 1), gc(0, 2), gc(1, 2), gc(2, 2), gc(2, 1), gc(2, 0)]);
    }

    #[test]
    fn path_to_start_is_just_the_start() {
        let g = corridor_grid();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(shortest_path(&g, &distances, gc(0, 0)), Some(vec![gc(0, 0)]));
    }

    #[test]
    fn component_counts() {
        assert_eq!(open_components(&corridor_grid()), 1);
        assert!(is_fully_connected(&corridor_grid()));

        let split = OccupancyGrid::parse("
            .#.
            ##.
            .#.
        ").unwrap();
        assert_eq!(open_components(&split), 3);
        assert!(!is_fully_connected(&split));

        let solid = OccupancyGrid::parse("##").unwrap();
        assert_eq!(open_components(&solid), 0);
        assert!(!is_fully_connected(&solid));
    }
}
