//! Settlement areas and the resolver that computes them
//!
//! A settlement owns a border area (its footprint) and, from Medium upward,
//! an outskirts ring around it. Villages get a small footprint of their own.

use ahash::AHashSet;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{GroupId, Location, PopulationCenterSize, PopulationGroupType};
use crate::settlement::border::trace_border;
use crate::settlement::matrix::TileMatrix;
use crate::settlement::population::Settlement;
use crate::world::grid::TileLookup;

/// Opaque handle of a border visual owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Names one of the areas a settlement owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaKind {
    Borders,
    Outskirts,
    Village(GroupId),
}

/// Tiles and outline of one area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementArea {
    pub tiles: AHashSet<Location>,
    /// Outline corners; the last point connects back to the first
    pub coordinates: Vec<Vec3>,
    pub visuals: Vec<VisualHandle>,
}

impl SettlementArea {
    pub fn new(tiles: AHashSet<Location>, coordinates: Vec<Vec3>) -> Self {
        Self {
            tiles,
            coordinates,
            visuals: Vec::new(),
        }
    }

    /// Swap in new geometry, handing back the visuals drawn for the old one
    pub fn replace(&mut self, tiles: AHashSet<Location>, coordinates: Vec<Vec3>) -> Vec<VisualHandle> {
        self.tiles = tiles;
        self.coordinates = coordinates;
        std::mem::take(&mut self.visuals)
    }

    pub fn attach_visuals(&mut self, handles: impl IntoIterator<Item = VisualHandle>) {
        self.visuals.extend(handles);
    }

    pub fn contains(&self, location: Location) -> bool {
        self.tiles.contains(&location)
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Consecutive outline corners, closing back on the first corner.
    /// One border visual is drawn per segment.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = if self.coordinates.len() < 2 {
            0
        } else {
            self.coordinates.len()
        };
        (0..n).map(move |i| (self.coordinates[i], self.coordinates[(i + 1) % n]))
    }

    /// Outline in the planar projection's ground plane
    pub fn outline_2d(&self) -> Vec<Vec2> {
        self.coordinates.iter().map(|p| p.truncate()).collect()
    }
}

/// Computes settlement footprints against a tile grid
pub struct AreaResolver<'a, G: TileLookup + ?Sized> {
    grid: &'a G,
}

/// Everything a settlement's areas are replaced with in one go
struct ResolvedAreas {
    border_tiles: AHashSet<Location>,
    border_outline: Vec<Vec3>,
    outskirts: Option<(AHashSet<Location>, Vec<Vec3>)>,
    villages: Vec<(GroupId, AHashSet<Location>)>,
}

impl<'a, G: TileLookup + ?Sized> AreaResolver<'a, G> {
    pub fn new(grid: &'a G) -> Self {
        Self { grid }
    }

    /// Matrix for a settlement of `size`, oriented by the tile at `center`
    pub fn tile_matrix_for(&self, size: PopulationCenterSize, center: Location) -> Result<TileMatrix> {
        let upward = self.grid.is_upward(center)?;
        Ok(TileMatrix::generate(size, upward))
    }

    /// Every tile the matrix covers around `center`, columns wrapped
    pub fn footprint_tiles(&self, matrix: &TileMatrix, center: Location) -> Result<AHashSet<Location>> {
        matrix
            .cells()
            .map(|cell| self.grid.resolve(center.row + cell.offset, center.col + cell.col))
            .collect()
    }

    /// Tiles of the outskirts ring of an expanded matrix
    pub fn outskirts_tiles(
        &self,
        matrix: &TileMatrix,
        radius: i32,
        center: Location,
    ) -> Result<AHashSet<Location>> {
        matrix
            .outskirts_cells(radius)
            .map(|cell| self.grid.resolve(center.row + cell.offset, center.col + cell.col))
            .collect()
    }

    /// Recompute the borders, outskirts and village areas of a settlement.
    ///
    /// Nothing is written until every area has been computed, so a failure
    /// leaves the settlement as it was. Returns the visual handles of the
    /// replaced outlines.
    pub fn determine_settlement_areas(&self, settlement: &mut Settlement) -> Result<Vec<VisualHandle>> {
        let resolved = self.resolve(settlement)?;

        tracing::debug!(
            "Resolved {} ({}): {} border tiles, {} outline points, {} outskirt tiles",
            settlement.name,
            settlement.size,
            resolved.border_tiles.len(),
            resolved.border_outline.len(),
            resolved.outskirts.as_ref().map_or(0, |(tiles, _)| tiles.len())
        );

        let mut released = settlement
            .borders
            .replace(resolved.border_tiles, resolved.border_outline);

        match resolved.outskirts {
            Some((tiles, outline)) => {
                let outskirts = settlement.outskirts.get_or_insert_with(SettlementArea::default);
                released.extend(outskirts.replace(tiles, outline));
            }
            None => {
                if let Some(old) = settlement.outskirts.take() {
                    released.extend(old.visuals);
                }
            }
        }

        for (id, tiles) in resolved.villages {
            if let Some(village) = settlement.groups.get_mut(&id) {
                released.extend(village.border_area.replace(tiles, Vec::new()));
            }
        }

        Ok(released)
    }

    fn resolve(&self, settlement: &Settlement) -> Result<ResolvedAreas> {
        let center = settlement.center;
        let mut matrix = self.tile_matrix_for(settlement.size, center)?;

        let border_tiles = self.footprint_tiles(&matrix, center)?;
        let border_outline = trace_border(self.grid, &matrix, center)?;

        let outskirts = if settlement.size.has_outskirts() {
            let radius = matrix.expand(settlement.size);
            let tiles = self.outskirts_tiles(&matrix, radius, center)?;
            let outline = trace_border(self.grid, &matrix, center)?;
            Some((tiles, outline))
        } else {
            None
        };

        let mut villages = Vec::new();
        for group in settlement
            .groups
            .values()
            .filter(|group| group.group_type == PopulationGroupType::Village)
        {
            let village_matrix = self.tile_matrix_for(PopulationCenterSize::Tiny, group.location)?;
            villages.push((group.id, self.footprint_tiles(&village_matrix, group.location)?));
        }

        Ok(ResolvedAreas {
            border_tiles,
            border_outline,
            outskirts,
            villages,
        })
    }
}
