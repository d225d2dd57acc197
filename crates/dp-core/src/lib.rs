pub mod color;
pub mod coords;
pub mod encode;
pub mod grid;

pub use color::Color;
pub use coords::{SurfaceRect, map_client_point};
pub use encode::{DATA_URI_PREFIX, EncodeError, encode_png, to_data_uri};
pub use grid::{CELL_SIZE, GRID_SIZE, GridCell, RASTER_SIZE, Raster};
