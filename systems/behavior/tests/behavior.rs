//! End-to-end scenarios for the behavioral state machine.

use std::collections::BTreeMap;

use pet_haven_core::{
    AgeStage, Animal, AnimalId, CellCoord, Direction, MapName, Needs, Route, ADULT_SPEED,
    ANIMAL_LAYER, CELL_SIZE, MAX_ENERGY, MAX_HUNGER, MAX_THIRST, WAKE_UP_TICKS,
};
use pet_haven_system_behavior::{is_stuck, recover, Behavior, Config};
use pet_haven_world::{MapTopology, Portal, Sanctuary, TileMap, ZoneKind};

fn meadow() -> TileMap {
    TileMap::new(MapName::new("Meadow"), 20, 20, ZoneKind::Main).expect("valid map")
}

fn cat_at(column: i32, row: i32, needs: Needs) -> Animal {
    Animal::new(
        AnimalId::new(1),
        "cat",
        column * CELL_SIZE,
        row * CELL_SIZE,
        MapName::new("Meadow"),
        AgeStage::Adult,
        needs,
    )
}

fn behavior(seed: u64) -> Behavior {
    Behavior::new(Config::new(seed, MapName::new("Meadow")))
}

fn empty_topology() -> MapTopology {
    MapTopology::from_maps(&BTreeMap::new())
}

#[test]
fn hungry_animal_finds_food_and_eats() {
    let mut map = meadow();
    map.place_food(CellCoord::new(5, 8));
    let mut animal = cat_at(5, 5, Needs::new(1_000, MAX_THIRST, MAX_ENERGY));
    let mut behavior = behavior(42);
    let topology = empty_topology();

    let mut satisfied = false;
    for _ in 0..5_000 {
        let _ = behavior.update_animal(&mut animal, &mut map, &topology);
        if animal.needs().hunger() > 20_000 {
            satisfied = true;
            break;
        }
    }

    assert!(satisfied, "the animal never reached the food");
    assert!(!map.has_food_at(CellCoord::new(5, 8)), "food was not consumed");
    assert_eq!(animal.speed(), ADULT_SPEED, "speed recovers after eating");
}

#[test]
fn thirsty_animal_drains_the_water_bowl() {
    let mut map = meadow();
    map.place_water_bowl(CellCoord::new(7, 5), true);
    let mut animal = cat_at(5, 5, Needs::new(MAX_HUNGER, 1_000, MAX_ENERGY));
    let mut behavior = behavior(7);
    let topology = empty_topology();

    let mut satisfied = false;
    for _ in 0..5_000 {
        let _ = behavior.update_animal(&mut animal, &mut map, &topology);
        if animal.needs().thirst() > 20_000 {
            satisfied = true;
            break;
        }
    }

    assert!(satisfied, "the animal never reached the bowl");
    assert!(
        !map.has_water_at(CellCoord::new(7, 5)),
        "the bowl should be empty after drinking"
    );
}

#[test]
fn tired_animal_sleeps_until_fully_rested_then_wakes() {
    let mut map = meadow();
    map.place_pillow(CellCoord::new(5, 5));
    let mut animal = cat_at(5, 5, Needs::new(MAX_HUNGER, MAX_THIRST, 9_000));
    let mut behavior = behavior(3);
    let topology = empty_topology();

    let mut woke = false;
    for _ in 0..10_000 {
        let report = behavior.update_animal(&mut animal, &mut map, &topology);
        if report.direction.is_waking_up() {
            woke = true;
            break;
        }
    }

    assert!(woke, "the animal never finished sleeping");
    assert_eq!(animal.needs().energy(), MAX_ENERGY);

    for _ in 0..WAKE_UP_TICKS {
        let _ = behavior.update_animal(&mut animal, &mut map, &topology);
    }
    assert_eq!(animal.direction(), Direction::Stay);
}

#[test]
fn animal_without_a_pillow_sleeps_in_place() {
    let mut map = meadow();
    let mut animal = cat_at(5, 5, Needs::new(MAX_HUNGER, MAX_THIRST, 9_000));
    let mut behavior = behavior(11);
    let topology = empty_topology();

    let mut slept = false;
    for _ in 0..50 {
        let _ = behavior.update_animal(&mut animal, &mut map, &topology);
        if animal.is_sleeping() {
            slept = true;
            break;
        }
    }

    assert!(slept, "with no pillow anywhere the animal sleeps where it stands");
}

#[test]
fn crossing_a_portal_reports_a_transition_and_clears_the_route() {
    let mut map = meadow();
    map.add_portal(Portal::new(
        CellCoord::new(0, 5),
        MapName::new("Garden"),
        ZoneKind::Standard,
    ));
    let mut animal = cat_at(1, 5, Needs::full());
    animal.assign_route(Route::from_steps(vec![Direction::Left]));
    let mut behavior = behavior(1);
    let topology = empty_topology();

    let report = behavior.update_animal(&mut animal, &mut map, &topology);

    assert_eq!(report.map_transition, Some(MapName::new("Garden")));
    assert!(animal.route().is_empty());
}

#[test]
fn portal_arrival_does_not_bounce_straight_back() {
    let mut sanctuary = Sanctuary::new(MapName::new("Meadow"));
    let mut meadow_map = meadow();
    meadow_map.add_portal(Portal::new(
        CellCoord::new(0, 5),
        MapName::new("Garden"),
        ZoneKind::Standard,
    ));
    let mut garden =
        TileMap::new(MapName::new("Garden"), 20, 20, ZoneKind::Standard).expect("valid map");
    garden.add_portal(Portal::new(
        CellCoord::new(19, 5),
        MapName::new("Meadow"),
        ZoneKind::Main,
    ));
    sanctuary.insert_map(meadow_map).expect("meadow");
    sanctuary.insert_map(garden).expect("garden");

    let mut animal = cat_at(1, 5, Needs::full());
    animal.assign_route(Route::from_steps(vec![Direction::Left]));
    sanctuary.spawn(animal).expect("spawn");

    let topology = sanctuary.topology().clone();
    let mut behavior = behavior(1);

    let mut crossing = None;
    for _ in 0..200 {
        let (map, roster) = sanctuary
            .map_and_roster_mut(&MapName::new("Meadow"))
            .expect("meadow");
        let report = behavior.update_animal(&mut roster[0], map, &topology);
        if let Some(destination) = report.map_transition {
            crossing = Some((roster[0].id(), destination));
            break;
        }
    }
    let (id, destination) = crossing.expect("the animal never crossed");
    sanctuary.relocate(id, &destination).expect("relocate");

    let (map, roster) = sanctuary
        .map_and_roster_mut(&MapName::new("Garden"))
        .expect("garden");
    let arrived = &mut roster[0];
    assert_eq!(arrived.cell(), CellCoord::new(18, 5), "spawns beside the portal");

    // Any direction away from the portal must tick without re-crossing.
    arrived.set_direction(Direction::Up);
    arrived.set_moving_ticks(10);
    let report = behavior.update_animal(arrived, map, &topology);
    assert_eq!(
        report.map_transition, None,
        "arriving must not immediately count as another crossing"
    );
}

#[test]
fn waking_restores_the_species_default_speed() {
    let mut map = meadow();
    map.place_pillow(CellCoord::new(5, 5));
    let mut animal = cat_at(5, 5, Needs::new(MAX_HUNGER, MAX_THIRST, 3_000));
    animal.set_speed(1);
    let mut behavior = behavior(13);
    let topology = empty_topology();

    let mut woke = false;
    for _ in 0..10_000 {
        let report = behavior.update_animal(&mut animal, &mut map, &topology);
        if report.direction.is_waking_up() {
            woke = true;
            break;
        }
    }

    assert!(woke, "the animal never finished sleeping");
    assert_eq!(animal.needs().energy(), MAX_ENERGY);
    assert_eq!(
        animal.speed(),
        ADULT_SPEED,
        "speed should be restored once energy is satisfied"
    );
}

#[test]
fn route_steps_snap_off_accumulated_overshoot() {
    let mut map = meadow();
    map.add_collision_tile(ANIMAL_LAYER, CellCoord::new(7, 6));
    let mut animal = cat_at(6, 5, Needs::full());
    // Two pixels of overshoot left over from a previous step.
    animal.move_to(6 * CELL_SIZE + 2, 5 * CELL_SIZE);
    animal.assign_route(Route::from_steps(vec![Direction::Down]));
    let mut behavior = behavior(1);
    let topology = empty_topology();

    let report = behavior.update_animal(&mut animal, &mut map, &topology);

    assert_eq!(animal.rect().x(), 6 * CELL_SIZE, "origin snaps onto its column");
    assert_eq!(report.direction, Direction::Down);
    assert!(report.moved, "the clear column must stay traversable");
    assert!(animal.moving_ticks() > 0, "the step must not be aborted");
}

#[test]
fn one_tick_is_enough_to_plan_the_route_to_food() {
    let mut map = meadow();
    map.place_food(CellCoord::new(5, 8));
    let mut animal = cat_at(5, 5, Needs::new(1_000, MAX_THIRST, MAX_ENERGY));
    // Mid-cell so this tick's movement cannot change the occupied cell.
    animal.move_to(5 * CELL_SIZE + 30, 5 * CELL_SIZE + 30);
    let mut behavior = behavior(42);
    let topology = empty_topology();

    let _ = behavior.update_animal(&mut animal, &mut map, &topology);

    assert_eq!(animal.route().len(), 3);
    assert!(animal.route().iter().all(|step| *step == Direction::Down));
}

#[test]
fn transitional_zones_are_escaped_through_the_portal() {
    let mut edge =
        TileMap::new(MapName::new("SouthEdge"), 10, 10, ZoneKind::Transitional).expect("valid map");
    edge.add_portal(Portal::new(
        CellCoord::new(0, 5),
        MapName::new("Meadow"),
        ZoneKind::Main,
    ));
    let mut animal = cat_at(5, 5, Needs::full());
    animal.set_current_map(MapName::new("SouthEdge"));
    let mut behavior = behavior(9);
    let topology = empty_topology();

    let mut escaped = false;
    for _ in 0..2_000 {
        let report = behavior.update_animal(&mut animal, &mut edge, &topology);
        if report.map_transition == Some(MapName::new("Meadow")) {
            escaped = true;
            break;
        }
    }

    assert!(escaped, "the animal never left the transitional zone");
}

#[test]
fn fully_blocked_animal_is_stuck_and_recenters() {
    let mut map = meadow();
    for (column, row) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
        map.add_collision_tile(ANIMAL_LAYER, CellCoord::new(column, row));
    }
    let mut animal = cat_at(5, 5, Needs::full());

    assert!(is_stuck(&map, &animal));
    assert!(recover(&map, &mut animal));
    assert_eq!(animal.cell(), CellCoord::new(10, 10));
    assert!(!is_stuck(&map, &animal));
}

#[test]
fn recovery_prefers_an_adjacent_walkable_cell() {
    let mut map = meadow();
    for (column, row) in [(4, 5), (6, 5), (5, 4)] {
        map.add_collision_tile(ANIMAL_LAYER, CellCoord::new(column, row));
    }
    let mut animal = cat_at(5, 5, Needs::full());

    assert!(recover(&map, &mut animal));
    assert_eq!(animal.cell(), CellCoord::new(5, 6));
}

#[test]
fn recovery_fails_when_the_center_is_also_blocked() {
    let mut map = meadow();
    for (column, row) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
        map.add_collision_tile(ANIMAL_LAYER, CellCoord::new(column, row));
    }
    for (column, row) in [(9, 10), (11, 10), (10, 9), (10, 11)] {
        map.add_collision_tile(ANIMAL_LAYER, CellCoord::new(column, row));
    }
    let mut animal = cat_at(5, 5, Needs::full());

    assert!(!recover(&map, &mut animal));
}

#[test]
fn baby_grows_up_while_ticking() {
    let mut map = meadow();
    let mut animal = Animal::new(
        AnimalId::new(2),
        "rat",
        5 * CELL_SIZE,
        5 * CELL_SIZE,
        MapName::new("Meadow"),
        AgeStage::Baby,
        Needs::full(),
    );
    // One tick from the growth threshold.
    while animal.current_age() < pet_haven_core::GROWING_UP_TIME - 1 {
        animal.increment_age();
    }
    let mut behavior = behavior(5);
    let topology = empty_topology();

    let _ = behavior.update_animal(&mut animal, &mut map, &topology);

    assert_eq!(animal.age(), AgeStage::Adult);
}
