//! Dense world grid of triangular tiles

use glam::Vec3;

use crate::core::config::WorldConfig;
use crate::core::error::{CivError, Result};
use crate::core::types::Location;
use crate::world::projection::{Projection, WorldDimensions};
use crate::world::tile::{SurfacePoint, Tile};

/// Wrap a column index into `[0, width)`.
#[inline]
pub fn normalize_col(col: i32, width: i32) -> i32 {
    col.rem_euclid(width)
}

/// Read access to tile orientation and surface geometry.
///
/// The settlement geometry only needs this view of the world, so tests and
/// tools can supply their own grids.
pub trait TileLookup {
    fn height_in_tiles(&self) -> i32;

    fn width_in_tiles(&self) -> i32;

    fn is_upward(&self, location: Location) -> Result<bool>;

    /// World-space corner of the tile at `row` and the unwrapped column `col`
    fn surface_point(&self, row: i32, col: i32, which: SurfacePoint) -> Result<Vec3>;

    /// Resolve a raw coordinate to a grid location, wrapping the column.
    /// Rows outside the grid are an error.
    fn resolve(&self, row: i32, col: i32) -> Result<Location> {
        let rows = self.height_in_tiles();
        let cols = self.width_in_tiles();
        if row < 0 || row >= rows {
            return Err(CivError::LocationOutOfBounds { row, col, rows, cols });
        }
        Ok(Location::new(row, normalize_col(col, cols)))
    }
}

/// Row-major tile storage for the whole world
#[derive(Debug, Clone)]
pub struct WorldGrid {
    pub dimensions: WorldDimensions,
    pub projection: Projection,
    data: Vec<Tile>,
}

impl WorldGrid {
    pub fn new(config: &WorldConfig) -> Result<Self> {
        let dimensions = WorldDimensions::from_config(config)?;
        let rows = dimensions.height_in_tiles;
        let cols = dimensions.width_in_tiles;

        let mut data = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                data.push(Tile::new(Location::new(row, col), &dimensions.metrics));
            }
        }

        Ok(Self {
            dimensions,
            projection: config.projection,
            data,
        })
    }

    #[inline]
    fn index(&self, location: Location) -> Option<usize> {
        let rows = self.dimensions.height_in_tiles;
        let cols = self.dimensions.width_in_tiles;
        if location.row >= 0 && location.row < rows && location.col >= 0 && location.col < cols {
            Some((location.row * cols + location.col) as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, location: Location) -> Option<&Tile> {
        self.index(location).map(|idx| &self.data[idx])
    }

    #[inline]
    pub fn get_mut(&mut self, location: Location) -> Option<&mut Tile> {
        match self.index(location) {
            Some(idx) => Some(&mut self.data[idx]),
            None => None,
        }
    }

    /// Tile at a location, failing on anything outside the grid
    pub fn tile(&self, location: Location) -> Result<&Tile> {
        self.get(location).ok_or_else(|| self.out_of_bounds(location))
    }

    pub fn tile_mut(&mut self, location: Location) -> Result<&mut Tile> {
        let err = self.out_of_bounds(location);
        self.get_mut(location).ok_or(err)
    }

    pub fn contains(&self, location: Location) -> bool {
        self.index(location).is_some()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.data.iter()
    }

    fn out_of_bounds(&self, location: Location) -> CivError {
        CivError::LocationOutOfBounds {
            row: location.row,
            col: location.col,
            rows: self.dimensions.height_in_tiles,
            cols: self.dimensions.width_in_tiles,
        }
    }
}

impl TileLookup for WorldGrid {
    fn height_in_tiles(&self) -> i32 {
        self.dimensions.height_in_tiles
    }

    fn width_in_tiles(&self) -> i32 {
        self.dimensions.width_in_tiles
    }

    fn is_upward(&self, location: Location) -> Result<bool> {
        self.tile(location).map(|tile| tile.is_upward)
    }

    fn surface_point(&self, row: i32, col: i32, which: SurfacePoint) -> Result<Vec3> {
        let location = self.resolve(row, col)?;
        let tile = self.tile(location)?;
        Ok(self
            .dimensions
            .world_point(self.projection, row, col, tile.surface.point(which)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> WorldGrid {
        WorldGrid::new(&WorldConfig::default().with_size(8, 16)).unwrap()
    }

    #[test]
    fn test_normalize_col() {
        assert_eq!(normalize_col(-1, 1024), 1023);
        assert_eq!(normalize_col(1024, 1024), 0);
        assert_eq!(normalize_col(5, 1024), 5);
        assert_eq!(normalize_col(-1025, 1024), 1023);
        assert_eq!(normalize_col(2049, 1024), 1);
    }

    #[test]
    fn test_grid_is_dense() {
        let grid = small_grid();
        assert_eq!(grid.tiles().count(), 8 * 16);
        for tile in grid.tiles() {
            assert_eq!(grid.tile(tile.location).unwrap().location, tile.location);
        }
    }

    #[test]
    fn test_tile_lookup_out_of_bounds() {
        let grid = small_grid();
        assert!(grid.get(Location::new(8, 0)).is_none());
        assert!(grid.get(Location::new(0, 16)).is_none());
        assert!(grid.get(Location::new(-1, 0)).is_none());
        assert!(matches!(
            grid.tile(Location::new(9, 3)),
            Err(CivError::LocationOutOfBounds { row: 9, col: 3, rows: 8, cols: 16 })
        ));
    }

    #[test]
    fn test_resolve_wraps_columns_only() {
        let grid = small_grid();
        assert_eq!(grid.resolve(3, -1).unwrap(), Location::new(3, 15));
        assert_eq!(grid.resolve(3, 16).unwrap(), Location::new(3, 0));
        assert!(grid.resolve(-1, 0).is_err());
        assert!(grid.resolve(8, 0).is_err());
    }

    #[test]
    fn test_orientation_lookup() {
        let grid = small_grid();
        assert!(!grid.is_upward(Location::new(0, 0)).unwrap());
        assert!(grid.is_upward(Location::new(0, 1)).unwrap());
        assert!(grid.is_upward(Location::new(1, 0)).unwrap());
    }

    #[test]
    fn test_surface_point_uses_unwrapped_column() {
        let grid = small_grid();
        let left_of_seam = grid.surface_point(2, -1, SurfacePoint::Pivot).unwrap();
        let far_side = grid.surface_point(2, 15, SurfacePoint::Pivot).unwrap();
        assert!(left_of_seam.x < 0.0);
        assert!(far_side.x > 0.0);
        assert!((left_of_seam.y - far_side.y).abs() < 0.001);
    }

    #[test]
    fn test_tile_mut_updates_housing() {
        let mut grid = small_grid();
        grid.tile_mut(Location::new(2, 2)).unwrap().housing_available = false;
        assert!(!grid.tile(Location::new(2, 2)).unwrap().housing_available);
        assert!(grid.tile_mut(Location::new(20, 2)).is_err());
    }
}
