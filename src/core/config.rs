//! World configuration with documented constants
//!
//! The defaults describe the standard world: a 64 x 1024 band of
//! triangular tiles with a tile side of 100 world units.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CivError, Result};
use crate::world::projection::Projection;

/// Configuration for a new game world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    // === GRID ===
    /// Number of tile rows. Rows do not wrap.
    ///
    /// Odd values are rounded down to the nearest even number when the
    /// world is created.
    pub height_in_tiles: i32,

    /// Number of tile columns around the world cylinder. Columns wrap.
    ///
    /// Odd values are rounded down like the height; power-of-two widths
    /// keep the per-column rotation angle exact.
    pub width_in_tiles: i32,

    // === TILE GEOMETRY ===
    /// Length of a tile side in world units
    ///
    /// Every other tile measurement (height, bisector, delta) derives
    /// from this value. The half side uses integer halving.
    pub tile_side: i32,

    /// How local tile surfaces are placed in world space
    pub projection: Projection,

    // === HOUSING ===
    /// Maximum population units a group's own tile can house
    pub max_population_per_tile: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            height_in_tiles: 64,
            width_in_tiles: 1024,
            tile_side: 100,
            projection: Projection::Planar,
            max_population_per_tile: 3,
        }
    }
}

impl WorldConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, height_in_tiles: i32, width_in_tiles: i32) -> Self {
        self.height_in_tiles = height_in_tiles;
        self.width_in_tiles = width_in_tiles;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        // The cylinder needs at least three tile pairs around its circumference
        if self.width_in_tiles < 6 {
            return Err(CivError::InvalidWorldDimensions(format!(
                "width_in_tiles ({}) must be at least 6",
                self.width_in_tiles
            )));
        }

        if self.height_in_tiles < 2 {
            return Err(CivError::InvalidWorldDimensions(format!(
                "height_in_tiles ({}) must be at least 2",
                self.height_in_tiles
            )));
        }

        if self.tile_side < 2 {
            return Err(CivError::InvalidWorldDimensions(format!(
                "tile_side ({}) must be at least 2",
                self.tile_side
            )));
        }

        if self.max_population_per_tile == 0 {
            return Err(CivError::Config(
                "max_population_per_tile must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Load a world configuration from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a world configuration from a TOML string
    ///
    /// Missing keys fall back to the defaults.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: WorldConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
