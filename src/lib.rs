//! **maze_halls** generates grid mazes and turns them into walkable 3D halls.
//!
//! A `generators::GridGenerator` carves an `grid::OccupancyGrid`, the `locator` picks a start
//! and a goal cell on it and `mesh::MeshSynthesizer` builds floor, ceiling and wall geometry.
//! `session::MazeSession` runs the whole pipeline and keeps the latest maze installed in a
//! `host::MazeHost`.

pub mod cells;
pub mod config;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_displays;
pub mod grid_iterators;
pub mod host;
pub mod layout_images;
pub mod locator;
pub mod mesh;
pub mod obj_export;
pub mod pathing;
pub mod quad;
pub mod session;
pub mod units;
mod utils;
