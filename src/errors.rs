// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
use error_chain::*;
// Lets `use crate::errors::*;` bring `bail!` along too.
pub use error_chain::bail;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        Image(::image::ImageError);
        Spec(::ron::error::SpannedError);
    }

    errors {
        DegenerateBounds(rows: usize, columns: usize) {
            description("maze dimensions must both be positive")
            display("degenerate maze bounds: {} rows x {} columns", rows, columns)
        }
        EmptyGrid {
            description("occupancy grid has no open cell")
            display("occupancy grid has no open cell to place a start or goal on")
        }
        DisconnectedGrid(components: usize) {
            description("open cells of the grid are not all connected")
            display("open cells form {} separate regions, expected 1", components)
        }
        LayoutMismatch(expected: (usize, usize), actual: (usize, usize)) {
            description("layout dimensions differ from the requested maze dimensions")
            display("layout is {}x{} but a {}x{} maze was requested",
                    actual.0, actual.1, expected.0, expected.1)
        }
        MeshTooLarge(vertices: usize) {
            description("mesh has more vertices than u32 indices can address")
            display("mesh with {} vertices can not take another quad with u32 indices", vertices)
        }
        InvalidLayout(reason: String) {
            description("malformed maze layout")
            display("malformed maze layout: {}", reason)
        }
    }
}
