//! World layer - tile grid, tile geometry and projection

pub mod grid;
pub mod projection;
pub mod tile;

pub use grid::{normalize_col, TileLookup, WorldGrid};
pub use projection::{Projection, WorldDimensions};
pub use tile::{is_upward_at, SurfacePoint, Tile, TileMetrics, TileSurface};
