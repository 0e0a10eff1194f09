//! Settlement layer - footprints, outlines, population and housing

pub mod area;
pub mod border;
pub mod housing;
pub mod matrix;
pub mod population;

pub use area::{AreaKind, AreaResolver, SettlementArea, VisualHandle};
pub use border::trace_border;
pub use housing::determine_housing;
pub use matrix::{MatrixCell, TileMatrix, TileMatrixRow};
pub use population::{Population, PopulationGroup, Settlement};
