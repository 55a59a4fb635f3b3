#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line host that runs a headless sanctuary simulation.
//!
//! Builds a small multi-map sanctuary, scatters a handful of animals across
//! the main map, and drives the behavior system for a fixed number of ticks.
//! The same seed always produces the same run.

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use pet_haven_core::{
    AgeStage, Animal, AnimalId, CellCoord, MapName, Needs, ANIMAL_LAYER, CELL_SIZE, MAX_ENERGY,
    MAX_HUNGER, MAX_THIRST,
};
use pet_haven_system_behavior::{Behavior, Config};
use pet_haven_world::{query, MapTopology, Portal, Sanctuary, TileMap, ZoneKind};

const MAIN_MAP: &str = "Meadow";
const SPECIES: [&str; 4] = ["cat", "rat", "chicken", "butterfly"];

/// Headless sanctuary simulation driver.
#[derive(Debug, Parser)]
#[command(name = "pet-haven", about = "Runs a headless animal sanctuary simulation")]
struct Args {
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 10_000)]
    ticks: u32,

    /// Seed shared by behavioral randomness and initial placement.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of animals scattered across the main map.
    #[arg(long, default_value_t = 4)]
    animals: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut sanctuary = build_sanctuary()?;
    populate(&mut sanctuary, args.seed, args.animals)?;

    let mut behavior = Behavior::new(Config::new(args.seed, MapName::new(MAIN_MAP)));
    let topology = sanctuary.topology().clone();

    tracing::info!(
        ticks = args.ticks,
        seed = args.seed,
        animals = sanctuary.animal_count(),
        "starting simulation"
    );
    for _ in 0..args.ticks {
        run_tick(&mut sanctuary, &mut behavior, &topology)?;
    }

    print_summary(&sanctuary);
    Ok(())
}

fn run_tick(
    sanctuary: &mut Sanctuary,
    behavior: &mut Behavior,
    topology: &MapTopology,
) -> Result<()> {
    let names: Vec<MapName> = sanctuary.map_names().cloned().collect();
    let mut transitions: Vec<(AnimalId, MapName)> = Vec::new();

    for name in &names {
        let Some((map, roster)) = sanctuary.map_and_roster_mut(name) else {
            continue;
        };
        for animal in roster.iter_mut() {
            let report = behavior.update_animal(animal, map, topology);
            if let Some(destination) = report.map_transition {
                transitions.push((animal.id(), destination));
            }
        }
    }

    for (id, destination) in transitions {
        sanctuary
            .relocate(id, &destination)
            .with_context(|| format!("relocating animal {}", id.get()))?;
    }
    Ok(())
}

fn build_sanctuary() -> Result<Sanctuary> {
    let mut sanctuary = Sanctuary::new(MapName::new(MAIN_MAP));

    let mut meadow = TileMap::new(MapName::new(MAIN_MAP), 20, 20, ZoneKind::Main)?;
    meadow.place_food_bowl(CellCoord::new(3, 3), true);
    meadow.place_water_bowl(CellCoord::new(4, 3), true);
    meadow.place_food(CellCoord::new(12, 14));
    meadow.place_pillow(CellCoord::new(15, 15));
    for row in 8..12 {
        meadow.add_collision_tile(ANIMAL_LAYER, CellCoord::new(9, row));
    }
    meadow.add_portal(Portal::new(
        CellCoord::new(19, 10),
        MapName::new("Garden"),
        ZoneKind::Standard,
    ));
    meadow.add_portal(Portal::new(
        CellCoord::new(10, 19),
        MapName::new("SouthEdge"),
        ZoneKind::Transitional,
    ));
    sanctuary.insert_map(meadow)?;

    let mut garden = TileMap::new(MapName::new("Garden"), 14, 14, ZoneKind::Standard)?;
    garden.place_food(CellCoord::new(6, 6));
    garden.add_portal(Portal::new(
        CellCoord::new(0, 7),
        MapName::new(MAIN_MAP),
        ZoneKind::Main,
    ));
    garden.add_portal(Portal::new(
        CellCoord::new(13, 7),
        MapName::new("Barn"),
        ZoneKind::Home,
    ));
    sanctuary.insert_map(garden)?;

    let mut barn = TileMap::new(MapName::new("Barn"), 8, 8, ZoneKind::Home)?;
    barn.place_pillow(CellCoord::new(4, 4));
    barn.add_portal(Portal::new(
        CellCoord::new(0, 4),
        MapName::new("Garden"),
        ZoneKind::Standard,
    ));
    sanctuary.insert_map(barn)?;

    let mut south_edge = TileMap::new(MapName::new("SouthEdge"), 12, 4, ZoneKind::Transitional)?;
    south_edge.add_portal(Portal::new(
        CellCoord::new(5, 0),
        MapName::new(MAIN_MAP),
        ZoneKind::Main,
    ));
    sanctuary.insert_map(south_edge)?;

    Ok(sanctuary)
}

fn populate(sanctuary: &mut Sanctuary, seed: u64, animals: u32) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for index in 0..animals {
        let species = SPECIES[index as usize % SPECIES.len()];
        let column = rng.gen_range(1..19);
        let row = rng.gen_range(1..19);
        let needs = Needs::new(
            rng.gen_range(5_000..MAX_HUNGER),
            rng.gen_range(5_000..MAX_THIRST),
            rng.gen_range(8_000..MAX_ENERGY),
        );
        let age = if rng.gen_bool(0.25) {
            AgeStage::Baby
        } else {
            AgeStage::Adult
        };
        let mut animal = Animal::new(
            AnimalId::new(index + 1),
            species,
            column * CELL_SIZE,
            row * CELL_SIZE,
            MapName::new(MAIN_MAP),
            age,
            needs,
        );
        if species == "butterfly" {
            animal.set_avoids_home_portals(true);
        }
        sanctuary.spawn(animal)?;
    }
    Ok(())
}

fn print_summary(sanctuary: &Sanctuary) {
    let view = query::animal_view(sanctuary);
    for snapshot in view.iter() {
        println!(
            "#{:<3} {:<10} {:<10} cell ({:>2},{:>2}) hunger {:>3}% thirst {:>3}% energy {:>3}% {:?}",
            snapshot.id.get(),
            snapshot.species,
            snapshot.map.as_str(),
            snapshot.cell.column(),
            snapshot.cell.row(),
            snapshot.hunger_percent,
            snapshot.thirst_percent,
            snapshot.energy_percent,
            snapshot.age,
        );
    }
    println!("{} animals simulated", sanctuary.animal_count());
}
