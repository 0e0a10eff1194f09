pub mod config;
pub mod error;
pub mod types;

pub use config::WorldConfig;
pub use error::{CivError, Result};
pub use types::{
    Assignment, GroupId, Location, PopulationCenterSize, PopulationGroupType, PopulationId,
    SettlementId, Turn,
};
