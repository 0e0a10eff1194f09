use thiserror::Error;

use crate::core::types::{GroupId, SettlementId};

#[derive(Error, Debug)]
pub enum CivError {
    #[error("Invalid settlement size ordinal: {0} (expected 1..=6)")]
    InvalidSize(u8),

    #[error("Location ({row}, {col}) is outside the {rows}x{cols} world grid")]
    LocationOutOfBounds {
        row: i32,
        col: i32,
        rows: i32,
        cols: i32,
    },

    #[error("Tile matrix has no rows")]
    EmptyTileMatrix,

    #[error("Invalid world dimensions: {0}")]
    InvalidWorldDimensions(String),

    #[error("Settlement not found: {0:?}")]
    SettlementNotFound(SettlementId),

    #[error("Population group not found: {0:?}")]
    PopulationGroupNotFound(GroupId),

    #[error("{0} has no outskirts below Medium size")]
    NoOutskirts(String),

    #[error("Population group {0:?} is not a village")]
    NotAVillage(GroupId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CivError>;
