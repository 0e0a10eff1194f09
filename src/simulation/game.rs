//! Game orchestration - explicit turn entry points over the world grid
//!
//! The game owns the grid and every settlement. Each turn, settlements are
//! checked for promotion in id order; promoted settlements get their areas
//! recomputed and every settlement gets its housing refreshed.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::WorldConfig;
use crate::core::error::{CivError, Result};
use crate::core::types::{
    GroupId, Location, PopulationCenterSize, PopulationGroupType, PopulationId, SettlementId, Turn,
};
use crate::settlement::area::{AreaKind, AreaResolver, VisualHandle};
use crate::settlement::housing::determine_housing;
use crate::settlement::population::{PopulationGroup, Settlement};
use crate::world::grid::{TileLookup, WorldGrid};

/// Something that happened during a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SettlementPromoted {
        settlement: SettlementId,
        name: String,
        from: PopulationCenterSize,
        to: PopulationCenterSize,
    },
    /// The settlement earned a larger size but its footprint would leave
    /// the grid, so it keeps its current size
    PromotionBlocked {
        settlement: SettlementId,
        name: String,
        size: PopulationCenterSize,
        reason: String,
    },
}

/// Outcome of one call to [`Game::advance_turn`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnSummary {
    pub turn: Turn,
    pub events: Vec<GameEvent>,
    /// Border visuals the renderer should drop
    pub released_visuals: Vec<VisualHandle>,
}

impl TurnSummary {
    pub fn promoted(&self) -> impl Iterator<Item = SettlementId> + '_ {
        self.events.iter().filter_map(|event| match event {
            GameEvent::SettlementPromoted { settlement, .. } => Some(*settlement),
            GameEvent::PromotionBlocked { .. } => None,
        })
    }
}

pub struct Game {
    config: WorldConfig,
    grid: WorldGrid,
    turn: Turn,
    settlements: AHashMap<SettlementId, Settlement>,
}

impl Game {
    pub fn new(config: WorldConfig) -> Result<Self> {
        let grid = WorldGrid::new(&config)?;
        tracing::info!(
            "New game on a {}x{} world ({:?} projection)",
            grid.dimensions.height_in_tiles,
            grid.dimensions.width_in_tiles,
            grid.projection
        );
        Ok(Self {
            config,
            grid,
            turn: 1,
            settlements: AHashMap::new(),
        })
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn settlement(&self, id: SettlementId) -> Result<&Settlement> {
        self.settlements.get(&id).ok_or(CivError::SettlementNotFound(id))
    }

    /// Settlements in id order
    pub fn settlements(&self) -> Vec<&Settlement> {
        let mut settlements: Vec<&Settlement> = self.settlements.values().collect();
        settlements.sort_by_key(|settlement| settlement.id);
        settlements
    }

    /// Found a Tiny settlement around `center`. The column may be given
    /// unwrapped.
    pub fn found_settlement(&mut self, name: impl Into<String>, center: Location) -> Result<SettlementId> {
        let center = self.grid.resolve(center.row, center.col)?;
        let mut settlement = Settlement::found(name, center, self.turn);
        refresh_settlement(&mut self.grid, self.config.max_population_per_tile, &mut settlement)?;

        tracing::info!(
            "Founded {} at {} on turn {} ({} border tiles)",
            settlement.name,
            settlement.center,
            self.turn,
            settlement.borders.tiles.len()
        );

        let id = settlement.id;
        self.settlements.insert(id, settlement);
        Ok(id)
    }

    pub fn add_district(&mut self, id: SettlementId, location: Location) -> Result<GroupId> {
        let (group, _) = self.add_group(id, PopulationGroupType::District, location)?;
        Ok(group)
    }

    /// Villages get their own footprint, so the settlement's areas are
    /// recomputed right away. Returns the new group and the visuals of the
    /// replaced outlines.
    pub fn add_village(
        &mut self,
        id: SettlementId,
        location: Location,
    ) -> Result<(GroupId, Vec<VisualHandle>)> {
        self.add_group(id, PopulationGroupType::Village, location)
    }

    /// Record the visuals a renderer drew for one of a settlement's areas.
    /// They are handed back once that area is replaced.
    pub fn attach_visuals(
        &mut self,
        id: SettlementId,
        kind: AreaKind,
        handles: impl IntoIterator<Item = VisualHandle>,
    ) -> Result<()> {
        let settlement = self
            .settlements
            .get_mut(&id)
            .ok_or(CivError::SettlementNotFound(id))?;
        settlement.area_mut(kind)?.attach_visuals(handles);
        Ok(())
    }

    pub fn add_population(&mut self, id: SettlementId, group: GroupId) -> Result<PopulationId> {
        let turn = self.turn;
        let max = self.config.max_population_per_tile;
        let settlement = self
            .settlements
            .get_mut(&id)
            .ok_or(CivError::SettlementNotFound(id))?;
        let population = settlement.group_mut(group)?.add_population(turn);
        determine_housing(settlement, &mut self.grid, max)?;
        Ok(population)
    }

    /// Grow a settlement to at least `size` and recompute its areas.
    /// Settlements never shrink; a smaller size is ignored.
    pub fn grow_settlement(&mut self, id: SettlementId, size: PopulationCenterSize) -> Result<Vec<VisualHandle>> {
        let max = self.config.max_population_per_tile;
        let settlement = self
            .settlements
            .get_mut(&id)
            .ok_or(CivError::SettlementNotFound(id))?;
        if size <= settlement.size {
            return Ok(Vec::new());
        }

        let previous = settlement.size;
        settlement.size = size;
        match refresh_settlement(&mut self.grid, max, settlement) {
            Ok(released) => {
                tracing::info!("{} grew from {} to {}", settlement.name, previous, size);
                Ok(released)
            }
            Err(err) => {
                settlement.size = previous;
                Err(err)
            }
        }
    }

    /// Recompute a settlement's areas and housing on demand
    pub fn recompute_areas(&mut self, id: SettlementId) -> Result<Vec<VisualHandle>> {
        let max = self.config.max_population_per_tile;
        let settlement = self
            .settlements
            .get_mut(&id)
            .ok_or(CivError::SettlementNotFound(id))?;
        refresh_settlement(&mut self.grid, max, settlement)
    }

    /// Advance to the next turn: promote settlements that earned it, then
    /// refresh housing everywhere
    pub fn advance_turn(&mut self) -> Result<TurnSummary> {
        self.turn += 1;
        let max = self.config.max_population_per_tile;
        let mut summary = TurnSummary {
            turn: self.turn,
            ..Default::default()
        };

        let mut ids: Vec<SettlementId> = self.settlements.keys().copied().collect();
        ids.sort();

        for id in ids {
            let Some(settlement) = self.settlements.get_mut(&id) else {
                continue;
            };

            let previous = settlement.size;
            if settlement.determine_size() {
                match AreaResolver::new(&self.grid).determine_settlement_areas(settlement) {
                    Ok(released) => {
                        tracing::info!(
                            "{} promoted from {} to {} on turn {}",
                            settlement.name,
                            previous,
                            settlement.size,
                            self.turn
                        );
                        summary.released_visuals.extend(released);
                        summary.events.push(GameEvent::SettlementPromoted {
                            settlement: id,
                            name: settlement.name.clone(),
                            from: previous,
                            to: settlement.size,
                        });
                    }
                    Err(err) => {
                        tracing::warn!(
                            "{} cannot grow to {}: {}",
                            settlement.name,
                            settlement.size,
                            err
                        );
                        summary.events.push(GameEvent::PromotionBlocked {
                            settlement: id,
                            name: settlement.name.clone(),
                            size: settlement.size,
                            reason: err.to_string(),
                        });
                        settlement.size = previous;
                    }
                }
            }

            determine_housing(settlement, &mut self.grid, max)?;
        }

        tracing::debug!(
            "Turn {} complete: {} events",
            summary.turn,
            summary.events.len()
        );
        Ok(summary)
    }

    fn add_group(
        &mut self,
        id: SettlementId,
        group_type: PopulationGroupType,
        location: Location,
    ) -> Result<(GroupId, Vec<VisualHandle>)> {
        let location = self.grid.resolve(location.row, location.col)?;
        let turn = self.turn;
        let max = self.config.max_population_per_tile;
        let settlement = self
            .settlements
            .get_mut(&id)
            .ok_or(CivError::SettlementNotFound(id))?;

        let name = match group_type {
            PopulationGroupType::District => format!("{} District {}", settlement.name, settlement.groups.len()),
            PopulationGroupType::Village => format!("{} Village {}", settlement.name, settlement.groups.len()),
        };
        let group = PopulationGroup::new(name, group_type, location, turn);

        if group_type == PopulationGroupType::Village {
            // Resolve on a copy so a village footprint off the grid changes nothing
            let mut updated = settlement.clone();
            let group_id = updated.add_group(group);
            let released = refresh_settlement(&mut self.grid, max, &mut updated)?;
            *settlement = updated;
            return Ok((group_id, released));
        }

        let group_id = settlement.add_group(group);
        determine_housing(settlement, &mut self.grid, max)?;
        Ok((group_id, Vec::new()))
    }
}

/// Recompute areas, then housing, for one settlement
fn refresh_settlement(
    grid: &mut WorldGrid,
    max_population_per_tile: usize,
    settlement: &mut Settlement,
) -> Result<Vec<VisualHandle>> {
    let released = AreaResolver::new(&*grid).determine_settlement_areas(settlement)?;
    determine_housing(settlement, grid, max_population_per_tile)?;
    Ok(released)
}
