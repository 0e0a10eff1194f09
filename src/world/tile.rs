//! Triangular tiles and their fixed surface geometry

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::Location;

/// Precomputed measurements of an equilateral tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileMetrics {
    pub side: f32,
    /// Half of the side, rounded down to a whole unit
    pub half_side: f32,
    pub height: f32,
    pub bisector: f32,
    pub delta: f32,
    pub half_bisector: f32,
}

impl TileMetrics {
    pub fn new(tile_side: i32) -> Self {
        let side = tile_side as f32;
        let bisector = 3.0_f32.sqrt() * side / 2.0;
        Self {
            side,
            half_side: (tile_side / 2) as f32,
            height: 6.0_f32.sqrt() * side / 3.0,
            bisector,
            delta: 3.0_f32.sqrt() * side / 6.0,
            half_bisector: bisector / 2.0,
        }
    }

    /// Area of one triangular tile
    pub fn tile_area(&self) -> f32 {
        self.side * self.bisector / 2.0
    }
}

/// Index into a tile surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfacePoint {
    /// Left corner of the tile's flat side
    Pivot = 0,
    /// Apex on the vertical bisector
    Bisector = 1,
    /// Right corner of the tile's flat side
    Remaining = 2,
}

/// The three corners of a tile in its local frame.
///
/// Local `x` runs along the row, `y` is the radial height of the surface
/// and `z` points opposite to increasing rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSurface {
    points: [Vec3; 3],
}

impl TileSurface {
    pub fn new(metrics: &TileMetrics, is_upward: bool) -> Self {
        let TileMetrics {
            half_side,
            height,
            bisector,
            delta,
            ..
        } = *metrics;

        let points = if is_upward {
            [
                Vec3::new(-half_side, height, delta),
                Vec3::new(0.0, height, -bisector + delta),
                Vec3::new(half_side, height, delta),
            ]
        } else {
            [
                Vec3::new(-half_side, height, -delta),
                Vec3::new(0.0, height, bisector - delta),
                Vec3::new(half_side, height, -delta),
            ]
        };

        Self { points }
    }

    #[inline]
    pub fn point(&self, which: SurfacePoint) -> Vec3 {
        self.points[which as usize]
    }

    pub fn points(&self) -> &[Vec3; 3] {
        &self.points
    }
}

/// Orientation rule of the world grid: tile (0, 0) points down and
/// orientation alternates along both rows and columns.
#[inline]
pub fn is_upward_at(row: i32, col: i32) -> bool {
    (row + col).rem_euclid(2) == 1
}

/// A single world tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub location: Location,
    pub is_upward: bool,
    pub surface: TileSurface,
    pub housing_available: bool,
}

impl Tile {
    pub fn new(location: Location, metrics: &TileMetrics) -> Self {
        let is_upward = is_upward_at(location.row, location.col);
        Self {
            location,
            is_upward,
            surface: TileSurface::new(metrics, is_upward),
            housing_available: true,
        }
    }
}
