//! Housing availability of settlement tiles

use crate::core::error::Result;
use crate::settlement::population::Settlement;
use crate::world::grid::WorldGrid;

/// Mark which tiles of a settlement can take more population.
///
/// A group's own tile has room while it holds fewer than
/// `max_population_per_tile` populations. Tiles around a village are
/// reserved for its fields afterwards, so a district standing in a
/// village's fields never houses anyone.
pub fn determine_housing(
    settlement: &Settlement,
    grid: &mut WorldGrid,
    max_population_per_tile: usize,
) -> Result<()> {
    for group in settlement.groups.values() {
        grid.tile_mut(group.location)?.housing_available =
            group.population_count() < max_population_per_tile;
    }

    for village in settlement.villages() {
        for &location in &village.border_area.tiles {
            if location != village.location {
                grid.tile_mut(location)?.housing_available = false;
            }
        }
    }

    Ok(())
}
