use image::{GrayImage, Luma};
use std::path::Path;

use crate::cells::{CellCoordinate, CellState};
use crate::errors::*;
use crate::grid::OccupancyGrid;
use crate::grid_dimensions::MazeDimensions;
use crate::units::{ColumnsCount, RowsCount};

/// Pixels darker than this are blocked cells.
pub const BLOCKED_LUMA_THRESHOLD: u8 = 128;
const OPEN_LUMA: u8 = 255;
const BLOCKED_LUMA: u8 = 0;

/// One cell per pixel: pixel `(x, y)` is cell `(row y, col x)`.
pub fn grid_from_image(image: &GrayImage) -> Result<OccupancyGrid> {
    let dimensions = MazeDimensions::new(RowsCount(image.height() as usize),
                                         ColumnsCount(image.width() as usize))?;
    let mut grid = OccupancyGrid::open(dimensions);

    for (x, y, pixel) in image.enumerate_pixels() {
        let gray_scale_value = pixel.0[0];
        if gray_scale_value < BLOCKED_LUMA_THRESHOLD {
            grid.set(CellCoordinate::new(y as usize, x as usize), CellState::Blocked);
        }
    }

    Ok(grid)
}

/// Loads an authored layout from any image format the `image` crate reads, converting it to
/// grayscale first.
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<OccupancyGrid> {
    let path = path.as_ref();
    let image = image::open(path)
        .chain_err(|| format!("unable to open layout image {}", path.display()))?;
    grid_from_image(&image.to_luma8())
}

/// Renders each cell as a `cell_pixels` square, white when open and black when blocked.
pub fn grid_to_image(grid: &OccupancyGrid, cell_pixels: u32) -> GrayImage {
    let cell_pixels = cell_pixels.max(1);
    let width = grid.columns().0 as u32 * cell_pixels;
    let height = grid.rows().0 as u32 * cell_pixels;

    GrayImage::from_fn(width, height, |x, y| {
        let coord = CellCoordinate::new((y / cell_pixels) as usize, (x / cell_pixels) as usize);
        if grid.is_open(coord) {
            Luma([OPEN_LUMA])
        } else {
            Luma([BLOCKED_LUMA])
        }
    })
}

/// Always PNG format.
pub fn save_layout_image<P: AsRef<Path>>(grid: &OccupancyGrid,
                                         cell_pixels: u32,
                                         path: P)
                                         -> Result<()> {
    let path = path.as_ref();
    grid_to_image(grid, cell_pixels)
        .save_with_format(path, image::ImageFormat::Png)
        .chain_err(|| format!("unable to save layout image {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_pixels_are_blocked() {
        let image = GrayImage::from_raw(3, 2, vec![0, 200, 127, 128, 255, 10]).unwrap();
        let grid = grid_from_image(&image).unwrap();
        assert_eq!(grid.rows(), RowsCount(2));
        assert_eq!(grid.columns(), ColumnsCount(3));
        assert_eq!(grid, OccupancyGrid::parse("
            #.#
            ..#
        ").unwrap());
    }

    #[test]
    fn empty_images_are_degenerate() {
        let image = GrayImage::new(0, 0);
        match grid_from_image(&image) {
            Err(Error(ErrorKind::DegenerateBounds(0, 0), _)) => (),
            other => panic!("expected degenerate bounds, got {:?}", other),
        }
    }

    #[test]
    fn rendered_cells_are_squares() {
        let grid = OccupancyGrid::parse("
            .#
            #.
        ").unwrap();
        let image = grid_to_image(&grid, 3);
        assert_eq!(image.dimensions(), (6, 6));
        assert_eq!(image.get_pixel(0, 0).0[0], OPEN_LUMA);
        assert_eq!(image.get_pixel(2, 2).0[0], OPEN_LUMA);
        assert_eq!(image.get_pixel(3, 0).0[0], BLOCKED_LUMA);
        assert_eq!(image.get_pixel(5, 5).0[0], OPEN_LUMA);
        assert_eq!(image.get_pixel(0, 4).0[0], BLOCKED_LUMA);
    }

    #[test]
    fn one_pixel_per_cell_reloads_the_same_grid() {
        let grid = OccupancyGrid::parse("
            #####
            #...#
            ###.#
        ").unwrap();
        assert_eq!(grid_from_image(&grid_to_image(&grid, 1)).unwrap(), grid);
    }
}
