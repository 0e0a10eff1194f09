//! Civ Settlements - Entry Point
//!
//! Creates a world, founds a settlement, optionally grows it and plays a
//! number of turns, then prints the settlement's tile matrix, areas and
//! outline.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use civ_settlements::core::error::Result;
use civ_settlements::core::types::{Location, PopulationCenterSize, SettlementId};
use civ_settlements::core::WorldConfig;
use civ_settlements::settlement::{AreaResolver, TileMatrix};
use civ_settlements::simulation::{Game, GameEvent};
use civ_settlements::spatial::BorderValidator;

/// Settlement geometry runner
#[derive(Parser, Debug)]
#[command(name = "civ-settlements")]
#[command(about = "Found a settlement and print its footprint and border outline")]
struct Args {
    /// World configuration file (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// World height in tiles (overrides the config file)
    #[arg(long)]
    height: Option<i32>,

    /// World width in tiles (overrides the config file)
    #[arg(long)]
    width: Option<i32>,

    /// Settlement name
    #[arg(long, default_value = "Babylon")]
    name: String,

    /// Center row
    #[arg(long, default_value_t = 24)]
    row: i32,

    /// Center column (wraps around the world)
    #[arg(long, default_value_t = 1)]
    col: i32,

    /// Grow the settlement to this size right after founding (name or 1-6)
    #[arg(long)]
    size: Option<PopulationCenterSize>,

    /// Turns to play; each turn settles one more district
    #[arg(long, default_value_t = 0)]
    turns: u32,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct SettlementReport {
    turn: u32,
    name: String,
    size: PopulationCenterSize,
    center: Location,
    population: usize,
    matrix: TileMatrix,
    border_tiles: Vec<Location>,
    border_outline: Vec<[f32; 3]>,
    outskirts_tiles: Vec<Location>,
    outskirts_outline: Vec<[f32; 3]>,
    outline_area: f64,
    outline_errors: Vec<String>,
    events: Vec<GameEvent>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("civ_settlements=info")
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => WorldConfig::load_from_toml(path)?,
        None => WorldConfig::default(),
    };
    if let Some(height) = args.height {
        config.height_in_tiles = height;
    }
    if let Some(width) = args.width {
        config.width_in_tiles = width;
    }

    let mut game = Game::new(config)?;
    let id = game.found_settlement(args.name.clone(), Location::new(args.row, args.col))?;

    if let Some(size) = args.size {
        game.grow_settlement(id, size)?;
    }

    let mut events = Vec::new();
    for _ in 0..args.turns {
        settle_next_district(&mut game, id)?;
        events.extend(game.advance_turn()?.events);
    }

    let report = build_report(&game, id, events)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }

    Ok(())
}

/// Put a new district on the first free border tile, alternating between
/// one and two populations so the settlement keeps earning promotions
fn settle_next_district(game: &mut Game, id: SettlementId) -> Result<()> {
    let settlement = game.settlement(id)?;
    let mut free: Vec<Location> = settlement
        .borders
        .tiles
        .iter()
        .copied()
        .filter(|location| settlement.groups.values().all(|group| group.location != *location))
        .collect();
    free.sort();
    let districts = settlement.districts().count();

    let Some(location) = free.first().copied() else {
        tracing::info!("{} has no free border tiles left", settlement.name);
        return Ok(());
    };

    let group = game.add_district(id, location)?;
    game.add_population(id, group)?;
    if districts % 2 == 1 {
        game.add_population(id, group)?;
    }
    Ok(())
}

fn build_report(game: &Game, id: SettlementId, events: Vec<GameEvent>) -> Result<SettlementReport> {
    let settlement = game.settlement(id)?;
    let matrix = AreaResolver::new(game.grid()).tile_matrix_for(settlement.size, settlement.center)?;

    let outline = settlement.borders.outline_2d();
    let outline_errors = BorderValidator::validate_outline(&outline)
        .into_iter()
        .map(|err| format!("{:?}", err))
        .collect();

    let (outskirts_tiles, outskirts_outline) = match &settlement.outskirts {
        Some(area) => (sorted(&area.tiles), points(&area.coordinates)),
        None => (Vec::new(), Vec::new()),
    };

    Ok(SettlementReport {
        turn: game.turn(),
        name: settlement.name.clone(),
        size: settlement.size,
        center: settlement.center,
        population: settlement.population_count(),
        matrix,
        border_tiles: sorted(&settlement.borders.tiles),
        border_outline: points(&settlement.borders.coordinates),
        outskirts_tiles,
        outskirts_outline,
        outline_area: BorderValidator::outline_area(&outline),
        outline_errors,
        events,
    })
}

fn sorted<'a>(tiles: impl IntoIterator<Item = &'a Location>) -> Vec<Location> {
    let mut tiles: Vec<Location> = tiles.into_iter().copied().collect();
    tiles.sort();
    tiles
}

fn points(coordinates: &[glam::Vec3]) -> Vec<[f32; 3]> {
    coordinates.iter().map(|p| p.to_array()).collect()
}

fn print_text(report: &SettlementReport) {
    println!("\n=== {} ===", report.name);
    println!("Turn:        {}", report.turn);
    println!("Size:        {}", report.size);
    println!("Center:      {}", report.center);
    println!("Population:  {}", report.population);
    println!();
    println!("{}", report.matrix);
    println!();
    println!("Border tiles ({}):", report.border_tiles.len());
    for location in &report.border_tiles {
        println!("  {}", location);
    }
    println!("Border outline ({} points, area {:.1}):", report.border_outline.len(), report.outline_area);
    for [x, y, z] in &report.border_outline {
        println!("  ({:.2}, {:.2}, {:.2})", x, y, z);
    }
    if !report.outskirts_tiles.is_empty() {
        println!(
            "Outskirts: {} tiles, {} outline points",
            report.outskirts_tiles.len(),
            report.outskirts_outline.len()
        );
    }
    if !report.outline_errors.is_empty() {
        println!("Outline problems:");
        for err in &report.outline_errors {
            println!("  {}", err);
        }
    }
    for event in &report.events {
        match event {
            GameEvent::SettlementPromoted { name, from, to, .. } => {
                println!("Promoted {} from {} to {}", name, from, to)
            }
            GameEvent::PromotionBlocked { name, size, reason, .. } => {
                println!("{} could not grow to {}: {}", name, size, reason)
            }
        }
    }
}
