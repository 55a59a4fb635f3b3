#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick animal behavior: a priority-ordered state machine over sleeping,
//! waking, eating, escaping hostile zones, routed travel, and wandering.
//!
//! The system is deterministic for a given seed. All randomness (wander
//! direction picks and hold durations) flows through one seeded linear
//! congruential generator, so replaying the same seed against the same world
//! reproduces every tick exactly.

use pet_haven_core::{
    ActivityReport, Animal, Direction, MapName, NeedKind, TargetSelector, CELL_SIZE,
    WAKE_UP_TICKS,
};
use pet_haven_system_navigation::{pixels_to_cell_boundary, plan_route};
use pet_haven_world::{
    is_cell_walkable, is_direction_walkable, is_near_portal, is_outside_map, MapTopology, TileMap,
    ZoneKind,
};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Base duration in ticks for which a wander direction or an eating pause is
/// held; a random 0..20 spread is added on top.
const HOLD_TICKS_BASE: i32 = 64;

/// Candidate directions for a wander pick, including standing still.
const WANDER_CHOICES: [Direction; 5] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Stay,
];

/// Jump order tried by stuck recovery before falling back to the map center.
const RECOVERY_ORDER: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Up,
    Direction::Right,
];

/// Configuration parameters required to construct the behavior system.
#[derive(Clone, Debug)]
pub struct Config {
    rng_seed: u64,
    main_map: MapName,
}

impl Config {
    /// Creates a new configuration using the provided seed and the name of
    /// the sanctuary's main map.
    #[must_use]
    pub const fn new(rng_seed: u64, main_map: MapName) -> Self {
        Self { rng_seed, main_map }
    }
}

/// Drives one animal through one behavioral tick at a time.
#[derive(Debug)]
pub struct Behavior {
    rng_state: u64,
    main_map: MapName,
}

impl Behavior {
    /// Creates the behavior system from its configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng_state: config.rng_seed,
            main_map: config.main_map,
        }
    }

    /// Advances one animal by one tick against its current map.
    ///
    /// The animal is mutated in place; consumed resources are removed from
    /// the map. A reported map transition is a request: the host performs
    /// the actual roster move and respawn.
    pub fn update_animal(
        &mut self,
        animal: &mut Animal,
        map: &mut TileMap,
        topology: &MapTopology,
    ) -> ActivityReport {
        if animal.is_sleeping() {
            return tick_sleeping(animal);
        }
        if animal.direction().is_waking_up() {
            return tick_waking(animal);
        }
        if animal.direction().is_eating() {
            return self.tick_eating(animal);
        }

        self.escape_hostile_zone(animal, map, topology);

        if animal.moving_ticks() < 1 {
            self.choose_direction(animal);
        }

        if is_outside_map(map, animal.rect()) {
            let (x, y) = map.center();
            animal.move_to(x, y);
            animal.route_mut().clear();
            tracing::warn!(
                animal = animal.id().get(),
                map = %map.name(),
                "animal left the map bounds, recentered"
            );
        }

        let origin = animal.rect();
        let transition = self.advance(animal, map);
        animal.set_moving_ticks(animal.moving_ticks() - 1);

        let effects = pet_haven_system_needs::tick_awake(animal.needs_mut());
        if effects.slowed {
            animal.set_speed(1);
        }

        if transition.is_none() {
            self.resolve_needs(animal, map, topology, &effects);
        }

        age_tick(animal);

        ActivityReport {
            direction: animal.direction(),
            moved: animal.rect() != origin,
            map_transition: transition,
        }
    }

    fn advance(&mut self, animal: &mut Animal, map: &TileMap) -> Option<MapName> {
        let direction = animal.direction();
        let Some((dx, dy)) = direction.delta() else {
            return None;
        };

        if !is_direction_walkable(map, animal, direction) {
            animal.route_mut().clear();
            animal.set_moving_ticks(0);
            if is_stuck(map, animal) {
                let _ = recover(map, animal);
            }
            return None;
        }

        let speed = animal.speed();
        animal.translate(dx * speed, dy * speed);

        if !is_near_portal(map, animal.rect()) {
            let rect = animal.rect();
            let x = rect.x().clamp(0, map.pixel_width() - CELL_SIZE);
            let y = rect.y().clamp(0, map.pixel_height() - CELL_SIZE);
            if (x, y) != (rect.x(), rect.y()) {
                animal.move_to(x, y);
            }
        }

        let crossed = map
            .portals()
            .iter()
            .find(|portal| animal.rect().intersects(&portal.rect()))
            .map(|portal| portal.destination().clone());
        if let Some(destination) = &crossed {
            animal.route_mut().clear();
            animal.set_moving_ticks(0);
            tracing::info!(
                animal = animal.id().get(),
                from = %map.name(),
                to = %destination,
                "animal crossed a portal"
            );
        }
        crossed
    }

    fn choose_direction(&mut self, animal: &mut Animal) {
        if let Some(step) = animal.route_mut().take_step() {
            snap_to_grid(animal);
            let rect = animal.rect();
            let pixels = pixels_to_cell_boundary(step, rect.x(), rect.y());
            let speed = animal.speed().max(1);
            animal.set_direction(step);
            animal.set_moving_ticks((pixels + speed - 1) / speed);
        } else {
            let pick = (self.advance_rng() % WANDER_CHOICES.len() as u64) as usize;
            animal.set_direction(WANDER_CHOICES[pick]);
            let spread = (self.advance_rng() % 20) as i32;
            animal.set_moving_ticks(HOLD_TICKS_BASE + spread);
        }
    }

    fn escape_hostile_zone(&self, animal: &mut Animal, map: &TileMap, topology: &MapTopology) {
        let hostile = match map.zone() {
            ZoneKind::Transitional => true,
            ZoneKind::Home => animal.avoids_home_portals(),
            ZoneKind::Main | ZoneKind::Standard => false,
        };
        if !hostile || !animal.route().is_empty() {
            return;
        }
        let escape = plan_route(
            map,
            topology,
            animal,
            &TargetSelector::Portal(self.main_map.clone()),
        );
        if !escape.is_empty() {
            animal.assign_route(escape);
            animal.set_moving_ticks(0);
        }
    }

    fn resolve_needs(
        &mut self,
        animal: &mut Animal,
        map: &mut TileMap,
        topology: &MapTopology,
        effects: &pet_haven_system_needs::NeedsEffects,
    ) {
        let at = animal.cell();

        if pet_haven_system_needs::is_hunger_low(animal.needs())
            && map.has_food_at(at)
            && map.consume_food_at(at)
        {
            pet_haven_system_needs::satisfy(animal.needs_mut(), NeedKind::Hunger);
            self.begin_consuming(animal);
            return;
        }

        if pet_haven_system_needs::is_thirst_low(animal.needs())
            && map.has_water_at(at)
            && map.drink_water_at(at)
        {
            pet_haven_system_needs::satisfy(animal.needs_mut(), NeedKind::Thirst);
            self.begin_consuming(animal);
            return;
        }

        if effects.sleepy {
            if map.has_pillow_at(at) {
                fall_asleep(animal);
                return;
            }
            if animal.route().is_empty() {
                let route = plan_route(map, topology, animal, &TargetSelector::Pillow);
                if route.is_empty() {
                    fall_asleep(animal);
                } else {
                    animal.assign_route(route);
                    animal.set_moving_ticks(0);
                }
            }
            return;
        }

        if let Some(selector) = &effects.urgent_seek {
            if animal.route().is_empty() {
                let mut route = plan_route(map, topology, animal, selector);
                if route.is_empty()
                    && *selector == TargetSelector::Water
                    && *map.name() != self.main_map
                {
                    route = plan_route(
                        map,
                        topology,
                        animal,
                        &TargetSelector::Portal(self.main_map.clone()),
                    );
                }
                if !route.is_empty() {
                    animal.assign_route(route);
                    animal.set_moving_ticks(0);
                }
            }
        }
    }

    fn begin_consuming(&mut self, animal: &mut Animal) {
        animal.reset_speed_to_default();
        animal.route_mut().clear();
        animal.set_direction(animal.direction().eating_variant());
        let spread = (self.advance_rng() % 20) as i32;
        animal.set_moving_ticks(HOLD_TICKS_BASE + spread);
        tracing::debug!(animal = animal.id().get(), "animal started consuming");
    }

    fn tick_eating(&mut self, animal: &mut Animal) -> ActivityReport {
        let remaining = animal.moving_ticks() - 1;
        animal.set_moving_ticks(remaining.max(0));
        if remaining <= 0 {
            animal.set_direction(Direction::Stay);
        }

        let effects = pet_haven_system_needs::tick_awake(animal.needs_mut());
        if effects.slowed {
            animal.set_speed(1);
        }
        age_tick(animal);

        ActivityReport {
            direction: animal.direction(),
            moved: false,
            map_transition: None,
        }
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}

/// Reports whether every cardinal direction is blocked for the animal.
#[must_use]
pub fn is_stuck(map: &TileMap, animal: &Animal) -> bool {
    RECOVERY_ORDER
        .iter()
        .all(|direction| !is_direction_walkable(map, animal, *direction))
}

/// Teleports a stuck animal to the first walkable adjacent cell, falling back
/// to the map center.
///
/// Returns `false` when even the center leaves the animal boxed in; the
/// condition is logged and the animal simply stays put until the map changes.
pub fn recover(map: &TileMap, animal: &mut Animal) -> bool {
    for direction in RECOVERY_ORDER {
        let target = animal.cell().step(direction);
        if is_cell_walkable(map, animal, target) {
            animal.move_to(target.column() * CELL_SIZE, target.row() * CELL_SIZE);
            animal.route_mut().clear();
            animal.set_moving_ticks(0);
            tracing::warn!(
                animal = animal.id().get(),
                map = %map.name(),
                "jumped stuck animal to an adjacent cell"
            );
            return true;
        }
    }

    let (x, y) = map.center();
    animal.move_to(x, y);
    animal.route_mut().clear();
    animal.set_moving_ticks(0);
    if is_stuck(map, animal) {
        tracing::error!(
            animal = animal.id().get(),
            map = %map.name(),
            "animal is still stuck after recentering"
        );
        return false;
    }
    tracing::warn!(
        animal = animal.id().get(),
        map = %map.name(),
        "recentered stuck animal"
    );
    true
}

fn tick_sleeping(animal: &mut Animal) -> ActivityReport {
    if pet_haven_system_needs::tick_asleep(animal.needs_mut()) {
        animal.reset_speed_to_default();
        if let Some(waking) = animal.direction().waking_variant() {
            animal.set_direction(waking);
            animal.set_moving_ticks(WAKE_UP_TICKS);
        }
    }
    age_tick(animal);

    ActivityReport {
        direction: animal.direction(),
        moved: false,
        map_transition: None,
    }
}

fn tick_waking(animal: &mut Animal) -> ActivityReport {
    let remaining = animal.moving_ticks() - 1;
    animal.set_moving_ticks(remaining.max(0));
    if remaining <= 0 {
        animal.set_direction(Direction::Stay);
    }
    age_tick(animal);

    ActivityReport {
        direction: animal.direction(),
        moved: false,
        map_transition: None,
    }
}

/// Absorbs per-step rounding drift before the next route step.
///
/// A hold of `ceil(pixels / speed)` ticks overshoots a cell boundary by up
/// to `speed - 1` pixels. Left uncorrected the footprint clips into the
/// neighboring row or column and can fail a walkability probe on a route the
/// planner proved clear. The drift is always smaller than one speed step, so
/// only origins that close to a boundary are snapped; a mid-cell origin
/// after wandering keeps its exact position.
fn snap_to_grid(animal: &mut Animal) {
    let rect = animal.rect();
    let speed = animal.speed().max(1);
    let x = nearest_boundary(rect.x());
    let y = nearest_boundary(rect.y());
    let x = if (rect.x() - x).abs() < speed { x } else { rect.x() };
    let y = if (rect.y() - y).abs() < speed { y } else { rect.y() };
    if (x, y) != (rect.x(), rect.y()) {
        animal.move_to(x, y);
    }
}

fn nearest_boundary(value: i32) -> i32 {
    (value + CELL_SIZE / 2).div_euclid(CELL_SIZE) * CELL_SIZE
}

fn fall_asleep(animal: &mut Animal) {
    animal.set_direction(animal.direction().sleeping_variant());
    animal.route_mut().clear();
    animal.set_moving_ticks(0);
    tracing::debug!(animal = animal.id().get(), "animal fell asleep");
}

fn age_tick(animal: &mut Animal) {
    animal.increment_age();
    if animal.age() == pet_haven_core::AgeStage::Baby && animal.is_time_to_grow_up() {
        animal.grow_up();
        tracing::info!(animal = animal.id().get(), "animal grew up");
    }
}
