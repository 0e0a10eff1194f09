//! Integration tests for the settlement layer
//!
//! These tests verify the complete pipeline from world creation to traced
//! settlement outlines:
//! - Footprint and outline of newly founded settlements
//! - Outskirts rings of larger settlements
//! - Promotion through explicit turns, with housing kept in sync
//!
//! Outlines are checked with the border validator in the ground plane of the
//! planar projection.

use ahash::AHashSet;
use civ_settlements::core::types::{Location, PopulationCenterSize};
use civ_settlements::core::WorldConfig;
use civ_settlements::settlement::{trace_border, AreaResolver, Settlement, TileMatrix};
use civ_settlements::simulation::{Game, GameEvent};
use civ_settlements::spatial::BorderValidator;
use civ_settlements::world::{Projection, TileLookup, WorldGrid};

fn standard_world() -> WorldGrid {
    WorldGrid::new(&WorldConfig::default()).unwrap()
}

// ============================================================================
// Founding
// ============================================================================

/// Integration test: founding the first settlement of a new game
///
/// A Tiny settlement at (24, 1) on the 64 x 1024 world covers four tiles and
/// is outlined by six corners.
#[test]
fn test_found_babylon() {
    let mut game = Game::new(WorldConfig::default()).unwrap();
    let id = game.found_settlement("Babylon", Location::new(24, 1)).unwrap();
    let settlement = game.settlement(id).unwrap();

    let expected: AHashSet<Location> = [(24, 0), (24, 1), (24, 2), (23, 1)]
        .into_iter()
        .map(|(row, col)| Location::new(row, col))
        .collect();
    assert_eq!(settlement.borders.tiles, expected);
    assert_eq!(settlement.borders.coordinates.len(), 6);
    assert_eq!(settlement.borders.segments().count(), 6);

    let outline = settlement.borders.outline_2d();
    assert!(BorderValidator::validate_outline(&outline).is_empty());
}

/// Integration test: a lone tile is outlined by its own three corners
#[test]
fn test_lone_tile_outline() {
    let grid = standard_world();
    for center in [Location::new(24, 1), Location::new(24, 0)] {
        let outline = trace_border(&grid, &TileMatrix::seed(), center).unwrap();
        assert_eq!(outline.len(), 3);

        let flat: Vec<_> = outline.iter().map(|p| p.truncate()).collect();
        let area = BorderValidator::outline_area(&flat);
        let tile_area = f64::from(grid.dimensions.metrics.tile_area());
        assert!((area - tile_area).abs() < 1.0);
    }
}

// ============================================================================
// Outlines for every size
// ============================================================================

/// Integration test: every size at both orientations traces a valid outline
///
/// The outline must be clockwise, must not cross itself and must enclose
/// exactly the area of the tiles in the footprint.
#[test]
fn test_outlines_valid_for_all_sizes() {
    let grid = standard_world();
    let tile_area = f64::from(grid.dimensions.metrics.tile_area());

    for size in PopulationCenterSize::ALL {
        for center in [Location::new(30, 101), Location::new(30, 100)] {
            let mut settlement = Settlement::found("Test", center, 1);
            settlement.size = size;
            AreaResolver::new(&grid)
                .determine_settlement_areas(&mut settlement)
                .unwrap();

            let outline = settlement.borders.outline_2d();
            let errors = BorderValidator::validate_outline(&outline);
            assert!(errors.is_empty(), "{size} at {center}: {errors:?}");

            let expected = settlement.borders.tiles.len() as f64 * tile_area;
            let area = BorderValidator::outline_area(&outline);
            assert!((area - expected).abs() < expected * 1e-3, "{size} at {center}");
        }
    }
}

/// Integration test: outskirts surround the settlement
///
/// The outskirts outline contains the border outline, and the outskirts
/// tiles together with the border tiles fill the expanded footprint. Both
/// center orientations are checked.
#[test]
fn test_outskirts_surround_borders() {
    let grid = standard_world();
    let tile_area = f64::from(grid.dimensions.metrics.tile_area());

    for size in [
        PopulationCenterSize::Medium,
        PopulationCenterSize::Large,
        PopulationCenterSize::Huge,
        PopulationCenterSize::Enourmous,
    ] {
        for center in [Location::new(32, 9), Location::new(32, 10)] {
            let mut settlement = Settlement::found("Ring", center, 1);
            settlement.size = size;
            AreaResolver::new(&grid)
                .determine_settlement_areas(&mut settlement)
                .unwrap();

            let outskirts = settlement.outskirts.as_ref().unwrap();
            assert!(outskirts.tiles.is_disjoint(&settlement.borders.tiles));

            let mut expanded = AreaResolver::new(&grid)
                .tile_matrix_for(size, center)
                .unwrap();
            expanded.expand(size);
            let total = outskirts.tiles.len() + settlement.borders.tiles.len();
            assert_eq!(total, expanded.tile_count(), "{size} at {center}");

            let outer = outskirts.outline_2d();
            assert!(BorderValidator::contains(&outer, &settlement.borders.outline_2d()));
            let errors = BorderValidator::validate_outline(&outer);
            assert!(errors.is_empty(), "{size} at {center}: {errors:?}");

            let expected = total as f64 * tile_area;
            let area = BorderValidator::outline_area(&outer);
            assert!((area - expected).abs() < expected * 1e-3, "{size} at {center}");
        }
    }
}

/// Integration test: footprints crossing the column seam wrap their tiles
/// but keep a continuous outline
#[test]
fn test_settlement_across_seam() {
    let grid = standard_world();
    let mut settlement = Settlement::found("Seam", Location::new(20, 1023), 1);
    settlement.size = PopulationCenterSize::Large;
    AreaResolver::new(&grid)
        .determine_settlement_areas(&mut settlement)
        .unwrap();

    assert!(settlement.borders.tiles.iter().any(|loc| loc.col < 10));
    assert!(settlement.borders.tiles.iter().any(|loc| loc.col > 1000));
    let errors = BorderValidator::validate_outline(&settlement.borders.outline_2d());
    assert!(errors.is_empty(), "{errors:?}");
}

/// Integration test: the cylindrical projection places the same outline on
/// the world cylinder
#[test]
fn test_cylindrical_outline_matches_planar_shape() {
    let planar = standard_world();
    let cylinder =
        WorldGrid::new(&WorldConfig::default().with_projection(Projection::Cylindrical)).unwrap();
    let matrix = TileMatrix::generate(PopulationCenterSize::Small, true);
    let center = Location::new(24, 1);

    let flat = trace_border(&planar, &matrix, center).unwrap();
    let wrapped = trace_border(&cylinder, &matrix, center).unwrap();
    assert_eq!(flat.len(), wrapped.len());

    let radius = cylinder.dimensions.radius;
    for (f, w) in flat.iter().zip(&wrapped) {
        // Same height along the world axis, pushed out to the cylinder
        assert!((f.y - w.y).abs() < 0.01);
        assert!((w.x * w.x + w.z * w.z).sqrt() > radius);
    }
    assert!(cylinder.is_upward(center).unwrap());
}

// ============================================================================
// Turns
// ============================================================================

/// Integration test: a settlement grows through turns
///
/// 1. Found a settlement
/// 2. Settle districts until it qualifies for Small, then Medium
/// 3. Verify each promotion recomputes the footprint and adds outskirts
#[test]
fn test_settlement_grows_over_turns() {
    let mut game = Game::new(WorldConfig::default()).unwrap();
    let id = game.found_settlement("Babylon", Location::new(32, 501)).unwrap();

    // Two more districts, one of them crowded
    let a = game.add_district(id, Location::new(32, 503)).unwrap();
    let b = game.add_district(id, Location::new(32, 505)).unwrap();
    game.add_population(id, a).unwrap();
    game.add_population(id, a).unwrap();
    game.add_population(id, b).unwrap();

    let summary = game.advance_turn().unwrap();
    assert!(matches!(
        summary.events.as_slice(),
        [GameEvent::SettlementPromoted {
            to: PopulationCenterSize::Small,
            ..
        }]
    ));

    // Five more districts, two of them crowded: 8 populated, 3 crowded
    for (i, col) in [507, 509, 511, 513, 515].into_iter().enumerate() {
        let group = game.add_district(id, Location::new(32, col)).unwrap();
        game.add_population(id, group).unwrap();
        if i < 2 {
            game.add_population(id, group).unwrap();
        }
    }

    let summary = game.advance_turn().unwrap();
    assert_eq!(summary.turn, 3);
    assert_eq!(summary.promoted().count(), 1);

    let settlement = game.settlement(id).unwrap();
    assert_eq!(settlement.size, PopulationCenterSize::Medium);
    assert_eq!(settlement.borders.tiles.len(), 22);
    assert_eq!(settlement.outskirts.as_ref().unwrap().tiles.len(), 126);
}

/// Integration test: settlements are processed in a stable order
#[test]
fn test_turns_are_deterministic() {
    let mut game = Game::new(WorldConfig::default().with_size(32, 128)).unwrap();
    let first = game.found_settlement("Kish", Location::new(10, 11)).unwrap();
    let second = game.found_settlement("Lagash", Location::new(20, 61)).unwrap();

    let listed: Vec<_> = game.settlements().iter().map(|s| s.id).collect();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(listed, expected);

    let summary = game.advance_turn().unwrap();
    assert!(summary.events.is_empty());
    assert!(summary.released_visuals.is_empty());
}

/// Integration test: world configuration loads from the shipped TOML file
#[test]
fn test_world_config_file() {
    let config = WorldConfig::load_from_toml(std::path::Path::new("data/world.toml")).unwrap();
    assert_eq!(config, WorldConfig::default());
    let game = Game::new(config).unwrap();
    assert_eq!(game.grid().width_in_tiles(), 1024);
}
