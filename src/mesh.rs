use glam::{Vec2, Vec3};
use log::debug;
use std::fmt;
use std::convert::TryFrom;

use crate::cells::{CellCoordinate, CompassPrimary};
use crate::errors::*;
use crate::grid::OccupancyGrid;
use crate::quad::{QuadPlacement, QUAD_UVS, QUAD_WINDING};
use crate::units::{HallHeight, HallWidth};

pub const DEFAULT_HALL_WIDTH: HallWidth = HallWidth(3.75);
pub const DEFAULT_HALL_HEIGHT: HallHeight = HallHeight(3.5);

/// The two material groups of a maze mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Submesh {
    FloorAndCeiling = 0,
    Walls = 1,
}

impl Submesh {
    pub const ALL: [Submesh; 2] = [Submesh::FloorAndCeiling, Submesh::Walls];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// First index of a quad appended after `vertex_count` vertices, if all 4 of its indices fit
/// in a `u32`.
fn quad_base_index(vertex_count: usize) -> Result<u32> {
    vertex_count.checked_add(3)
        .and_then(|last| u32::try_from(last).ok())
        .map(|last| last - 3)
        .ok_or_else(|| ErrorKind::MeshTooLarge(vertex_count).into())
}

/// Triangle soup of quads. No vertex is shared between quads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    submeshes: [Vec<u32>; 2],
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct MeshStats {
    pub vertices: usize,
    pub indices: usize,
    pub floor_ceiling_quads: usize,
    pub wall_quads: usize,
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "{} vertices, {} indices, {} floor/ceiling quads, {} wall quads",
               self.vertices,
               self.indices,
               self.floor_ceiling_quads,
               self.wall_quads)
    }
}

impl Mesh {
    pub fn new() -> Mesh {
        Mesh::default()
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Empty until `recalculate_normals` runs.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self, submesh: Submesh) -> &[u32] {
        &self.submeshes[submesh.index()]
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Appends 4 new vertices and UVs, and 6 indices to the submesh.
    pub fn add_quad(&mut self, placement: &QuadPlacement, submesh: Submesh) -> Result<()> {
        let base = quad_base_index(self.vertices.len())?;
        self.vertices.extend_from_slice(&placement.corners());
        self.uvs.extend_from_slice(&QUAD_UVS);
        self.submeshes[submesh.index()].extend(QUAD_WINDING.iter().map(|offset| base + offset));
        Ok(())
    }

    /// Per-vertex normals: the normalised sum of the normals of every triangle using the
    /// vertex, each triangle normal being `(b - a) x (c - a)` for its indices in order.
    /// Vertices no triangle uses get a zero normal.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for indices in &self.submeshes {
            for triangle in indices.chunks_exact(3) {
                let (ia, ib, ic) = (triangle[0] as usize, triangle[1] as usize, triangle[2] as usize);
                let (a, b, c) = (self.vertices[ia], self.vertices[ib], self.vertices[ic]);
                let face_normal = (b - a).cross(c - a).normalize_or_zero();
                normals[ia] += face_normal;
                normals[ib] += face_normal;
                normals[ic] += face_normal;
            }
        }

        self.normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    pub fn stats(&self) -> MeshStats {
        let quads_in = |submesh: Submesh| self.indices(submesh).len() / QUAD_WINDING.len();
        MeshStats {
            vertices: self.vertices.len(),
            indices: self.submeshes.iter().map(Vec::len).sum(),
            floor_ceiling_quads: quads_in(Submesh::FloorAndCeiling),
            wall_quads: quads_in(Submesh::Walls),
        }
    }
}

/// Turns occupancy grids into floor, ceiling and wall geometry.
///
/// Cell `(row, col)` is centred at world `(col * width, 0, row * width)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshSynthesizer {
    width: HallWidth,
    height: HallHeight,
}

impl Default for MeshSynthesizer {
    fn default() -> Self {
        MeshSynthesizer::new(DEFAULT_HALL_WIDTH, DEFAULT_HALL_HEIGHT)
    }
}

impl MeshSynthesizer {
    pub fn new(width: HallWidth, height: HallHeight) -> MeshSynthesizer {
        MeshSynthesizer { width, height }
    }

    #[inline]
    pub fn hall_width(&self) -> HallWidth {
        self.width
    }

    #[inline]
    pub fn hall_height(&self) -> HallHeight {
        self.height
    }

    /// Floor level centre of a cell.
    pub fn cell_to_world(&self, coord: CellCoordinate) -> Vec3 {
        let HallWidth(width) = self.width;
        Vec3::new(coord.col as f32 * width, 0.0, coord.row as f32 * width)
    }

    /// Fails with `MeshTooLarge` once the vertices outgrow `u32` indices, around a billion quads.
    pub fn build(&self, grid: &OccupancyGrid) -> Result<Mesh> {
        let (HallWidth(width), HallHeight(height)) = (self.width, self.height);
        let mut mesh = Mesh::new();

        for coord in grid.iter_open() {
            let floor_center = self.cell_to_world(coord);

            mesh.add_quad(&QuadPlacement::floor(floor_center, width),
                          Submesh::FloorAndCeiling)?;
            mesh.add_quad(&QuadPlacement::ceiling(floor_center + Vec3::Y * height, width),
                          Submesh::FloorAndCeiling)?;

            for &dir in CompassPrimary::WALL_ORDER.iter() {
                if grid.is_walled(coord, dir) {
                    let outwards = dir.world_offset();
                    let center = floor_center + outwards * (width * 0.5) + Vec3::Y * (height * 0.5);
                    mesh.add_quad(&QuadPlacement::wall(center, -outwards, width, height),
                                  Submesh::Walls)?;
                }
            }
        }

        mesh.recalculate_normals();
        debug!("synthesized maze mesh: {}", mesh.stats());
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::generators::{GridGenerator, RandomizedPrim};
    use crate::grid_dimensions::MazeDimensions;
    use crate::units::{ColumnsCount, RowsCount};

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-4), "{:?} != {:?}", a, b);
    }

    fn quad_normal(mesh: &Mesh, submesh: Submesh, quad: usize) -> Vec3 {
        let first_index = mesh.indices(submesh)[quad * 6 + 2] as usize;
        mesh.normals()[first_index]
    }

    fn quad_center(mesh: &Mesh, submesh: Submesh, quad: usize) -> Vec3 {
        let first_index = mesh.indices(submesh)[quad * 6 + 2] as usize;
        mesh.vertices()[first_index..first_index + 4].iter().fold(Vec3::ZERO, |acc, v| acc + *v) /
        4.0
    }

    #[test]
    fn single_open_cell_is_a_closed_box() {
        let grid = OccupancyGrid::parse(".").unwrap();
        let mesh = MeshSynthesizer::default().build(&grid).unwrap();

        assert_eq!(mesh.vertices().len(), 24);
        assert_eq!(mesh.uvs().len(), 24);
        assert_eq!(mesh.normals().len(), 24);
        assert_eq!(mesh.indices(Submesh::FloorAndCeiling).len() +
                   mesh.indices(Submesh::Walls).len(),
                   36);
        assert_eq!(mesh.stats(),
                   MeshStats {
                       vertices: 24,
                       indices: 36,
                       floor_ceiling_quads: 2,
                       wall_quads: 4,
                   });
        assert_eq!(mesh.submesh_count(), 2);
        assert_eq!(mesh.quad_count(), 6);
    }

    #[test]
    fn floor_and_ceiling_face_into_the_hall() {
        let grid = OccupancyGrid::parse(".").unwrap();
        let mesh = MeshSynthesizer::default().build(&grid).unwrap();

        assert_close(quad_normal(&mesh, Submesh::FloorAndCeiling, 0), Vec3::Y);
        assert_close(quad_center(&mesh, Submesh::FloorAndCeiling, 0), Vec3::ZERO);
        assert_close(quad_normal(&mesh, Submesh::FloorAndCeiling, 1), Vec3::NEG_Y);
        assert_close(quad_center(&mesh, Submesh::FloorAndCeiling, 1), Vec3::new(0.0, 3.5, 0.0));
    }

    #[test]
    fn walls_are_emitted_north_east_west_south_facing_inwards() {
        let grid = OccupancyGrid::parse(".").unwrap();
        let mesh = MeshSynthesizer::default().build(&grid).unwrap();
        let expected = [(Vec3::new(0.0, 1.75, -1.875), Vec3::Z),
                        (Vec3::new(1.875, 1.75, 0.0), Vec3::NEG_X),
                        (Vec3::new(-1.875, 1.75, 0.0), Vec3::X),
                        (Vec3::new(0.0, 1.75, 1.875), Vec3::NEG_Z)];
        for (quad, &(center, normal)) in expected.iter().enumerate() {
            assert_close(quad_center(&mesh, Submesh::Walls, quad), center);
            assert_close(quad_normal(&mesh, Submesh::Walls, quad), normal);
        }
    }

    #[test]
    fn quads_use_the_fixed_winding_and_uvs() {
        let grid = OccupancyGrid::parse(".").unwrap();
        let mesh = MeshSynthesizer::default().build(&grid).unwrap();
        assert_eq!(&mesh.indices(Submesh::FloorAndCeiling)[..6], &[2, 1, 0, 3, 2, 0]);
        assert_eq!(&mesh.indices(Submesh::FloorAndCeiling)[6..], &[6, 5, 4, 7, 6, 4]);
        assert_eq!(&mesh.indices(Submesh::Walls)[..6], &[10, 9, 8, 11, 10, 8]);
        for quad_uvs in mesh.uvs().chunks(4) {
            assert_eq!(quad_uvs, &QUAD_UVS);
        }
    }

    #[test]
    fn no_walls_between_open_cells() {
        let grid = OccupancyGrid::parse("..").unwrap();
        let mesh = MeshSynthesizer::default().build(&grid).unwrap();
        // two cells: north, south and one outer side each
        assert_eq!(mesh.stats().wall_quads, 6);
        assert_eq!(mesh.stats().floor_ceiling_quads, 4);
        for quad in 0..mesh.stats().wall_quads {
            let center = quad_center(&mesh, Submesh::Walls, quad);
            assert!((center.x - 1.875).abs() > 1e-3, "wall between open cells at {:?}", center);
        }
    }

    #[test]
    fn blocked_cells_contribute_nothing() {
        let grid = OccupancyGrid::parse("###").unwrap();
        let mesh = MeshSynthesizer::default().build(&grid).unwrap();
        assert_eq!(mesh.stats(), MeshStats::default());
        assert!(mesh.normals().is_empty());
    }

    #[test]
    fn quad_indices_must_fit_in_u32() {
        let limit = u32::MAX as usize;
        assert_eq!(quad_base_index(0).unwrap(), 0);
        assert_eq!(quad_base_index(limit - 3).unwrap(), u32::MAX - 3);
        match quad_base_index(limit - 2) {
            Err(Error(ErrorKind::MeshTooLarge(count), _)) => assert_eq!(count, limit - 2),
            other => panic!("expected the mesh to be too large, got {:?}", other),
        }
        assert!(quad_base_index(usize::MAX).is_err());
    }

    #[test]
    fn custom_hall_size() {
        let synthesizer = MeshSynthesizer::new(HallWidth(2.0), HallHeight(5.0));
        assert_close(synthesizer.cell_to_world(CellCoordinate::new(3, 1)),
                     Vec3::new(2.0, 0.0, 6.0));
        let mesh = synthesizer.build(&OccupancyGrid::parse(".").unwrap()).unwrap();
        let top = mesh.vertices().iter().map(|v| v.y).fold(f32::MIN, f32::max);
        assert!((top - 5.0).abs() < 1e-5);
    }

    #[test]
    fn wall_count_matches_walled_sides() {
        fn matches(rows: u8, columns: u8, seed: u64) -> TestResult {
            let (rows, columns) = (rows as usize % 25, columns as usize % 25);
            if rows == 0 || columns == 0 {
                return TestResult::discard();
            }
            let dimensions = MazeDimensions::new(RowsCount(rows), ColumnsCount(columns)).unwrap();
            let grid = RandomizedPrim::from_seed(seed).generate(dimensions).unwrap();
            let mesh = MeshSynthesizer::default().build(&grid).unwrap();

            let walled_sides = grid.iter_open()
                .map(|coord| {
                    CompassPrimary::WALL_ORDER
                        .iter()
                        .filter(|dir| grid.is_walled(coord, **dir))
                        .count()
                })
                .sum::<usize>();
            let stats = mesh.stats();
            TestResult::from_bool(stats.wall_quads == walled_sides &&
                                  stats.floor_ceiling_quads == 2 * grid.open_cells_count() &&
                                  stats.vertices == 4 * (stats.wall_quads +
                                                         stats.floor_ceiling_quads))
        }
        quickcheck(matches as fn(u8, u8, u64) -> TestResult);
    }
}
