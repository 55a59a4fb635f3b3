//! Scenario coverage for the breadth-first route planner.

use std::collections::BTreeMap;

use pet_haven_core::{
    AgeStage, Animal, AnimalId, CellCoord, Direction, MapName, Needs, Route, TargetSelector,
    ANIMAL_LAYER, CELL_SIZE,
};
use pet_haven_system_navigation::plan_route;
use pet_haven_world::{MapTopology, Portal, TileMap, ZoneKind};

fn meadow() -> TileMap {
    TileMap::new(MapName::new("Meadow"), 20, 20, ZoneKind::Main).expect("valid map")
}

fn cat_at(column: i32, row: i32) -> Animal {
    Animal::new(
        AnimalId::new(1),
        "cat",
        column * CELL_SIZE,
        row * CELL_SIZE,
        MapName::new("Meadow"),
        AgeStage::Adult,
        Needs::full(),
    )
}

fn empty_topology() -> MapTopology {
    MapTopology::from_maps(&BTreeMap::new())
}

#[test]
fn plans_a_shortest_route_to_the_nearest_food() {
    let mut map = meadow();
    map.place_food(CellCoord::new(5, 8));
    let animal = cat_at(5, 5);

    let route = plan_route(&map, &empty_topology(), &animal, &TargetSelector::Food);

    assert_eq!(route.len(), 3);
    assert!(route.iter().all(|step| *step == Direction::Down));
}

#[test]
fn equidistant_targets_resolve_deterministically() {
    let mut map = meadow();
    // Same Manhattan distance above and below; Down expands first.
    map.place_water_bowl(CellCoord::new(5, 7), true);
    map.place_water_bowl(CellCoord::new(5, 3), true);
    let animal = cat_at(5, 5);
    let topology = empty_topology();

    let first = plan_route(&map, &topology, &animal, &TargetSelector::Water);
    let second = plan_route(&map, &topology, &animal, &TargetSelector::Water);

    assert_eq!(first, second);
    let steps: Vec<Direction> = first.iter().copied().collect();
    assert_eq!(steps, vec![Direction::Down, Direction::Down]);
}

#[test]
fn unreachable_targets_yield_an_empty_route() {
    let mut map = meadow();
    map.place_food(CellCoord::new(10, 10));
    for (column, row) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
        map.add_collision_tile(ANIMAL_LAYER, CellCoord::new(column, row));
    }
    let animal = cat_at(5, 5);

    let route = plan_route(&map, &empty_topology(), &animal, &TargetSelector::Food);

    assert!(route.is_empty());
}

#[test]
fn absent_targets_yield_an_empty_route() {
    let map = meadow();
    let animal = cat_at(5, 5);

    let route = plan_route(&map, &empty_topology(), &animal, &TargetSelector::Pillow);

    assert!(route.is_empty());
}

#[test]
fn standing_on_the_target_needs_no_route() {
    let mut map = meadow();
    map.place_food(CellCoord::new(5, 5));
    let animal = cat_at(5, 5);

    let route = plan_route(&map, &empty_topology(), &animal, &TargetSelector::Food);

    assert!(route.is_empty());
}

#[test]
fn an_unconsumed_route_is_never_replanned() {
    let mut map = meadow();
    map.place_food(CellCoord::new(5, 8));
    let mut animal = cat_at(5, 5);
    let pending = Route::from_steps(vec![Direction::Right, Direction::Right]);
    animal.assign_route(pending.clone());

    let route = plan_route(&map, &empty_topology(), &animal, &TargetSelector::Food);

    assert_eq!(route, pending);
}

#[test]
fn plans_toward_npcs_and_landmarks() {
    let mut map = meadow();
    map.add_npc(CellCoord::new(5, 6));
    map.add_city_cell(CellCoord::new(9, 5));
    let animal = cat_at(5, 5);
    let topology = empty_topology();

    let to_npc = plan_route(&map, &topology, &animal, &TargetSelector::Npc);
    assert_eq!(to_npc.len(), 1);

    let to_city = plan_route(&map, &topology, &animal, &TargetSelector::City);
    assert_eq!(to_city.len(), 4);
    assert!(to_city.iter().all(|step| *step == Direction::Right));
}

#[test]
fn plans_toward_a_direct_portal() {
    let mut map = meadow();
    map.add_portal(Portal::new(
        CellCoord::new(5, 9),
        MapName::new("Garden"),
        ZoneKind::Standard,
    ));
    let animal = cat_at(5, 5);

    let route = plan_route(
        &map,
        &empty_topology(),
        &animal,
        &TargetSelector::Portal(MapName::new("Garden")),
    );

    assert_eq!(route.len(), 4);
    assert!(route.iter().all(|step| *step == Direction::Down));
}

#[test]
fn distant_maps_route_through_the_next_hop_portal() {
    // Meadow -> Garden -> Barn; from Meadow the plan targets the Garden portal.
    let mut maps = BTreeMap::new();
    let mut meadow = meadow();
    meadow.add_portal(Portal::new(
        CellCoord::new(5, 2),
        MapName::new("Garden"),
        ZoneKind::Standard,
    ));
    let mut garden =
        TileMap::new(MapName::new("Garden"), 10, 10, ZoneKind::Standard).expect("valid map");
    garden.add_portal(Portal::new(
        CellCoord::new(0, 0),
        MapName::new("Barn"),
        ZoneKind::Home,
    ));
    let _ = maps.insert(MapName::new("Meadow"), meadow.clone());
    let _ = maps.insert(MapName::new("Garden"), garden);
    let topology = MapTopology::from_maps(&maps);

    let animal = cat_at(5, 5);
    let route = plan_route(
        &meadow,
        &topology,
        &animal,
        &TargetSelector::Portal(MapName::new("Barn")),
    );

    assert_eq!(route.len(), 3);
    assert!(route.iter().all(|step| *step == Direction::Up));
}

#[test]
fn the_goal_cell_is_exempt_from_walkability() {
    let mut map = meadow();
    map.place_food(CellCoord::new(5, 8));
    map.add_collision_tile(ANIMAL_LAYER, CellCoord::new(5, 8));
    let animal = cat_at(5, 5);

    let route = plan_route(&map, &empty_topology(), &animal, &TargetSelector::Food);

    assert_eq!(route.len(), 3);
}
