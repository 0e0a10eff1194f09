//! World dimensions and the placement of tile surfaces in world space

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::config::WorldConfig;
use crate::core::error::Result;
use crate::world::tile::{is_upward_at, TileMetrics};

/// How local tile surfaces map into world space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Unrolled strip: `x` along rows, `y` up the rows, `z` is surface height.
    /// Wrapped columns are placed by their unwrapped index so outlines stay
    /// continuous across the seam.
    #[default]
    Planar,
    /// Tiles wrapped around the world's vertical axis, one rotation step per
    /// column.
    Cylindrical,
}

/// Derived world measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldDimensions {
    pub height_in_tiles: i32,
    pub width_in_tiles: i32,
    pub metrics: TileMetrics,
    /// Interior angle of the polygon formed by one ring of tile pairs (degrees)
    pub angle_between_tiles: f32,
    /// Rotation about the world axis between neighbouring columns (degrees)
    pub tile_rotation_angle: f32,
    pub radius: f32,
    pub world_height: f32,
}

impl WorldDimensions {
    /// Derive the world measurements. Odd tile counts are rounded down to
    /// even so every ring closes on matching orientations.
    pub fn from_config(config: &WorldConfig) -> Result<Self> {
        config.validate()?;

        let height_in_tiles = round_down_to_even(config.height_in_tiles);
        let width_in_tiles = round_down_to_even(config.width_in_tiles);
        if height_in_tiles != config.height_in_tiles || width_in_tiles != config.width_in_tiles {
            tracing::warn!(
                "World size {}x{} rounded down to {}x{}",
                config.height_in_tiles,
                config.width_in_tiles,
                height_in_tiles,
                width_in_tiles
            );
        }

        let metrics = TileMetrics::new(config.tile_side);
        let half_width = (width_in_tiles / 2) as f32;
        let angle_between_tiles = (180.0 * (half_width - 2.0)) / half_width;
        let radius = metrics.side / (2.0 * (std::f32::consts::PI / half_width).tan());

        Ok(Self {
            height_in_tiles,
            width_in_tiles,
            metrics,
            angle_between_tiles,
            tile_rotation_angle: (180.0 - angle_between_tiles) / 2.0,
            radius,
            world_height: height_in_tiles as f32 * metrics.bisector,
        })
    }

    /// Place a local surface point of tile (`row`, `col`) in world space.
    /// `col` may lie outside the grid; it is not wrapped here.
    pub fn world_point(&self, projection: Projection, row: i32, col: i32, local: Vec3) -> Vec3 {
        let TileMetrics {
            half_side,
            bisector,
            delta,
            ..
        } = self.metrics;

        let lift = if is_upward_at(row, col) { delta } else { 0.0 };
        let base = row as f32 * bisector - lift + 2.0 * delta;

        match projection {
            Projection::Planar => Vec3::new(
                col as f32 * half_side + local.x,
                base - local.z,
                local.y,
            ),
            Projection::Cylindrical => {
                // One half side along the row is one rotation step, so
                // neighbouring tiles meet on the same corners
                let steps = col as f32 + local.x / half_side;
                let angle = (steps * self.tile_rotation_angle).to_radians();
                Quat::from_rotation_y(angle) * Vec3::new(0.0, base - local.z, self.radius + local.y)
            }
        }
    }
}

fn round_down_to_even(value: i32) -> i32 {
    if value % 2 == 0 {
        value
    } else {
        value - 1
    }
}
