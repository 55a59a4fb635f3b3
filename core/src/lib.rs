#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pet Haven engine.
//!
//! This crate defines the value objects that connect the authoritative world,
//! the pure systems, and host adapters: pixel-space positions and footprints,
//! behavioral directions, consumable routes, need counters, and the animal
//! record itself. Systems mutate animals exclusively through the methods
//! exposed here so that the saturation and exclusivity invariants hold by
//! construction.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Side length of a single unzoomed tile measured in pixels.
pub const TILE_SIZE: i32 = 32;

/// Fixed zoom factor applied to every map surface.
pub const ZOOM: i32 = 2;

/// Side length of one grid cell in pixel space.
pub const CELL_SIZE: i32 = TILE_SIZE * ZOOM;

/// Upper bound of the hunger counter.
pub const MAX_HUNGER: i32 = 30_000;

/// Lower bound of the hunger counter; never reaches zero so that the
/// percentage math stays well-defined.
pub const MIN_HUNGER: i32 = 1;

/// Upper bound of the thirst counter.
pub const MAX_THIRST: i32 = 25_000;

/// Lower bound of the thirst counter.
pub const MIN_THIRST: i32 = 1;

/// Upper bound of the energy counter.
pub const MAX_ENERGY: i32 = 40_000;

/// Lower bound of the energy counter.
pub const MIN_ENERGY: i32 = 1;

/// Energy regained per tick while an animal sleeps.
pub const SLEEP_RECOVERY: i32 = 15;

/// Age in ticks at which a baby animal grows into an adult.
pub const GROWING_UP_TIME: u32 = 200_000;

/// Default movement speed of a baby animal in pixels per tick.
pub const BABY_SPEED: i32 = 2;

/// Default movement speed of an adult animal in pixels per tick.
pub const ADULT_SPEED: i32 = 3;

/// Duration of the waking-up transition in ticks.
pub const WAKE_UP_TICKS: i32 = 24;

/// Collision layer that animals test against when moving.
pub const ANIMAL_LAYER: i32 = 2;

/// Unique identifier assigned to an animal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AnimalId(u32);

impl AnimalId {
    /// Creates a new animal identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Name identifying one map surface within the sanctuary.
///
/// Animals hold a `MapName` as a weak reference; they never own the map
/// itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapName(String);

impl MapName {
    /// Creates a new map name from the provided string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrows the underlying name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed because an animal crossing a portal may probe a
/// cell one step outside the current map.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> i32 {
        (self.column - other.column).abs() + (self.row - other.row).abs()
    }

    /// Returns the neighboring cell one step in the provided direction, or
    /// the same cell when the direction carries no movement.
    #[must_use]
    pub fn step(self, direction: Direction) -> CellCoord {
        match direction.delta() {
            Some((dx, dy)) => CellCoord::new(self.column + dx, self.row + dy),
            None => self,
        }
    }
}

/// Axis-aligned box in pixel space used for footprint and tile intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl PixelRect {
    /// Constructs a rectangle from its upper-left corner and dimensions.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Constructs the pixel rectangle covered by the provided grid cell.
    #[must_use]
    pub const fn from_cell(cell: CellCoord) -> Self {
        Self {
            x: cell.column() * CELL_SIZE,
            y: cell.row() * CELL_SIZE,
            width: CELL_SIZE,
            height: CELL_SIZE,
        }
    }

    /// Horizontal position of the upper-left corner.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical position of the upper-left corner.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Width of the rectangle in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the rectangle in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Moves the rectangle to the provided upper-left corner.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Shifts the rectangle by the provided pixel deltas.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Returns a copy of the rectangle shifted by the provided deltas.
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }

    /// Reports whether two rectangles overlap by at least one pixel.
    #[must_use]
    pub const fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Grid cell containing the rectangle's upper-left corner.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.x.div_euclid(CELL_SIZE), self.y.div_euclid(CELL_SIZE))
    }
}

/// Behavioral direction of an animal for one tick.
///
/// Exactly one direction is active per animal per tick. The activity-qualified
/// variants (eating, sleeping, waking up) are mutually exclusive with plain
/// movement and with each other; any mapping to animation frames is a host
/// rendering concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
    /// No movement this tick.
    Stay,
    /// Eating while facing up.
    EatUp,
    /// Eating while facing down.
    EatDown,
    /// Eating while facing left.
    EatLeft,
    /// Eating while facing right.
    EatRight,
    /// Sleeping while facing left.
    SleepLeft,
    /// Sleeping while facing right.
    SleepRight,
    /// Waking up while facing left.
    WakeUpLeft,
    /// Waking up while facing right.
    WakeUpRight,
}

impl Direction {
    /// Reports whether the direction is one of the four movement directions.
    #[must_use]
    pub const fn is_cardinal(&self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// Reports whether the direction marks the animal as asleep.
    #[must_use]
    pub const fn is_sleeping(&self) -> bool {
        matches!(self, Self::SleepLeft | Self::SleepRight)
    }

    /// Reports whether the direction marks the waking-up transition.
    #[must_use]
    pub const fn is_waking_up(&self) -> bool {
        matches!(self, Self::WakeUpLeft | Self::WakeUpRight)
    }

    /// Reports whether the direction marks the animal as eating or drinking.
    #[must_use]
    pub const fn is_eating(&self) -> bool {
        matches!(
            self,
            Self::EatUp | Self::EatDown | Self::EatLeft | Self::EatRight
        )
    }

    /// Pixel-space unit delta for movement directions, `None` otherwise.
    #[must_use]
    pub const fn delta(&self) -> Option<(i32, i32)> {
        match self {
            Self::Up => Some((0, -1)),
            Self::Down => Some((0, 1)),
            Self::Left => Some((-1, 0)),
            Self::Right => Some((1, 0)),
            _ => None,
        }
    }

    /// Eating variant facing the same way as the current direction.
    ///
    /// Non-movement directions collapse to [`Direction::Stay`], matching the
    /// original behavior for sprite sheets without eating frames.
    #[must_use]
    pub const fn eating_variant(&self) -> Self {
        match self {
            Self::Up => Self::EatUp,
            Self::Down => Self::EatDown,
            Self::Left => Self::EatLeft,
            Self::Right => Self::EatRight,
            _ => Self::Stay,
        }
    }

    /// Sleeping variant derived from the current facing.
    #[must_use]
    pub const fn sleeping_variant(&self) -> Self {
        match self {
            Self::Up | Self::Left => Self::SleepLeft,
            _ => Self::SleepRight,
        }
    }

    /// Waking-up variant matching the current sleeping direction, if any.
    #[must_use]
    pub const fn waking_variant(&self) -> Option<Self> {
        match self {
            Self::SleepLeft => Some(Self::WakeUpLeft),
            Self::SleepRight => Some(Self::WakeUpRight),
            _ => None,
        }
    }
}

/// Ordered, one-shot sequence of movement steps produced by the route
/// planner.
///
/// A route is consumed one step at a time and never regenerated mid-traversal
/// unless explicitly invalidated with [`Route::clear`]. It never mixes
/// [`Direction::Stay`] with real steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    steps: VecDeque<Direction>,
}

impl Route {
    /// Creates an empty route.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a route from an ordered sequence of cardinal steps.
    #[must_use]
    pub fn from_steps(steps: Vec<Direction>) -> Self {
        debug_assert!(
            steps.iter().all(Direction::is_cardinal),
            "routes contain only cardinal steps"
        );
        Self {
            steps: steps.into(),
        }
    }

    /// Removes and returns the next step, or `None` when the route is drained.
    ///
    /// Consuming an already-empty route is a no-op.
    pub fn take_step(&mut self) -> Option<Direction> {
        self.steps.pop_front()
    }

    /// Reports whether the route has been fully consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps remaining in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Iterator over the remaining steps without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Direction> {
        self.steps.iter()
    }

    /// Invalidates the route, dropping any remaining steps.
    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

/// Kind of need tracked by an animal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedKind {
    /// Desire for food.
    Hunger,
    /// Desire for water.
    Thirst,
    /// Desire for rest.
    Energy,
}

/// Saturating hunger, thirst, and energy counters carried by every animal.
///
/// Each counter stays within `[1, MAX]`; the floor of one keeps the legacy
/// percentage math well-defined. Percentages truncate via
/// `value / (max / 100)` to preserve the original threshold behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Needs {
    hunger: i32,
    thirst: i32,
    energy: i32,
}

impl Needs {
    /// Creates a needs triple, clamping each counter into its valid range.
    #[must_use]
    pub fn new(hunger: i32, thirst: i32, energy: i32) -> Self {
        Self {
            hunger: hunger.clamp(MIN_HUNGER, MAX_HUNGER),
            thirst: thirst.clamp(MIN_THIRST, MAX_THIRST),
            energy: energy.clamp(MIN_ENERGY, MAX_ENERGY),
        }
    }

    /// Creates a fully satisfied needs triple.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            hunger: MAX_HUNGER,
            thirst: MAX_THIRST,
            energy: MAX_ENERGY,
        }
    }

    /// Current hunger counter.
    #[must_use]
    pub const fn hunger(&self) -> i32 {
        self.hunger
    }

    /// Current thirst counter.
    #[must_use]
    pub const fn thirst(&self) -> i32 {
        self.thirst
    }

    /// Current energy counter.
    #[must_use]
    pub const fn energy(&self) -> i32 {
        self.energy
    }

    /// Replaces the hunger counter, clamped into its valid range.
    pub fn set_hunger(&mut self, value: i32) {
        self.hunger = value.clamp(MIN_HUNGER, MAX_HUNGER);
    }

    /// Replaces the thirst counter, clamped into its valid range.
    pub fn set_thirst(&mut self, value: i32) {
        self.thirst = value.clamp(MIN_THIRST, MAX_THIRST);
    }

    /// Replaces the energy counter, clamped into its valid range.
    pub fn set_energy(&mut self, value: i32) {
        self.energy = value.clamp(MIN_ENERGY, MAX_ENERGY);
    }

    /// Current counter for the provided need kind.
    #[must_use]
    pub const fn value(&self, kind: NeedKind) -> i32 {
        match kind {
            NeedKind::Hunger => self.hunger,
            NeedKind::Thirst => self.thirst,
            NeedKind::Energy => self.energy,
        }
    }

    /// Hunger expressed as a truncated percentage of its maximum.
    #[must_use]
    pub const fn hunger_percent(&self) -> i32 {
        self.hunger / (MAX_HUNGER / 100)
    }

    /// Thirst expressed as a truncated percentage of its maximum.
    #[must_use]
    pub const fn thirst_percent(&self) -> i32 {
        self.thirst / (MAX_THIRST / 100)
    }

    /// Energy expressed as a truncated percentage of its maximum.
    #[must_use]
    pub const fn energy_percent(&self) -> i32 {
        self.energy / (MAX_ENERGY / 100)
    }
}

impl Default for Needs {
    fn default() -> Self {
        Self::full()
    }
}

/// Growth stage of an animal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeStage {
    /// Juvenile stage with reduced speed.
    Baby,
    /// Fully grown stage.
    Adult,
}

/// Semantic target understood by the route planner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSelector {
    /// Nearest loose food item or full food bowl.
    Food,
    /// Nearest full water bowl.
    Water,
    /// Nearest pillow cell.
    Pillow,
    /// Nearest NPC cell.
    Npc,
    /// Nearest NPC waiting spot.
    NpcSpot,
    /// Nearest city landmark cell.
    City,
    /// Nearest portal leading toward the named map.
    Portal(MapName),
}

/// Outcome of one behavioral tick reported back to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityReport {
    /// Direction active for the tick that just resolved.
    pub direction: Direction,
    /// Indicates whether the animal's position changed this tick.
    pub moved: bool,
    /// Destination tag of a portal the animal overlapped, if any. The host
    /// performs the actual roster move and respawn.
    pub map_transition: Option<MapName>,
}

/// A simulated creature with needs, position, and behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Animal {
    id: AnimalId,
    species: String,
    rect: PixelRect,
    direction: Direction,
    moving_ticks: i32,
    #[serde(skip)]
    route: Route,
    current_map: MapName,
    home_map: MapName,
    speed: i32,
    needs: Needs,
    age: AgeStage,
    current_age: u32,
    avoids_home_portals: bool,
}

impl Animal {
    /// Creates an animal at the provided pixel position with default speed
    /// for its age stage.
    #[must_use]
    pub fn new(
        id: AnimalId,
        species: impl Into<String>,
        start_x: i32,
        start_y: i32,
        current_map: MapName,
        age: AgeStage,
        needs: Needs,
    ) -> Self {
        let speed = match age {
            AgeStage::Baby => BABY_SPEED,
            AgeStage::Adult => ADULT_SPEED,
        };
        let current_age = match age {
            AgeStage::Baby => 0,
            AgeStage::Adult => GROWING_UP_TIME,
        };
        Self {
            id,
            species: species.into(),
            rect: PixelRect::new(start_x, start_y, CELL_SIZE, CELL_SIZE),
            direction: Direction::Down,
            moving_ticks: 0,
            route: Route::new(),
            home_map: current_map.clone(),
            current_map,
            speed,
            needs,
            age,
            current_age,
            avoids_home_portals: false,
        }
    }

    /// Unique identifier of the animal.
    #[must_use]
    pub const fn id(&self) -> AnimalId {
        self.id
    }

    /// Species name used by the host for presentation.
    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Current pixel-space footprint.
    #[must_use]
    pub const fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Grid cell currently containing the animal's footprint origin.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.rect.cell()
    }

    /// Moves the animal to the provided pixel position.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.rect.move_to(x, y);
    }

    /// Shifts the animal by the provided pixel deltas.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.rect.translate(dx, dy);
    }

    /// Direction active for the current tick.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Replaces the active direction.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Remaining ticks for which the current direction is held.
    #[must_use]
    pub const fn moving_ticks(&self) -> i32 {
        self.moving_ticks
    }

    /// Replaces the direction hold counter.
    pub fn set_moving_ticks(&mut self, ticks: i32) {
        self.moving_ticks = ticks;
    }

    /// Read-only access to the pending route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Mutable access to the pending route.
    pub fn route_mut(&mut self) -> &mut Route {
        &mut self.route
    }

    /// Replaces the pending route with a freshly planned one.
    pub fn assign_route(&mut self, route: Route) {
        self.route = route;
    }

    /// Name of the map the animal currently inhabits.
    #[must_use]
    pub const fn current_map(&self) -> &MapName {
        &self.current_map
    }

    /// Moves the animal's weak map reference to the provided name.
    pub fn set_current_map(&mut self, map: MapName) {
        self.current_map = map;
    }

    /// Name of the map the animal considers home.
    #[must_use]
    pub const fn home_map(&self) -> &MapName {
        &self.home_map
    }

    /// Replaces the animal's home map.
    pub fn set_home_map(&mut self, map: MapName) {
        self.home_map = map;
    }

    /// Current movement speed in pixels per tick.
    #[must_use]
    pub const fn speed(&self) -> i32 {
        self.speed
    }

    /// Replaces the movement speed.
    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed;
    }

    /// Restores the species-default speed for the animal's age stage.
    pub fn reset_speed_to_default(&mut self) {
        self.speed = match self.age {
            AgeStage::Baby => BABY_SPEED,
            AgeStage::Adult => ADULT_SPEED,
        };
    }

    /// Read-only access to the need counters.
    #[must_use]
    pub const fn needs(&self) -> &Needs {
        &self.needs
    }

    /// Mutable access to the need counters.
    pub fn needs_mut(&mut self) -> &mut Needs {
        &mut self.needs
    }

    /// Current growth stage.
    #[must_use]
    pub const fn age(&self) -> AgeStage {
        self.age
    }

    /// Monotonically increasing age counter in ticks.
    #[must_use]
    pub const fn current_age(&self) -> u32 {
        self.current_age
    }

    /// Advances the age counter by one tick.
    pub fn increment_age(&mut self) {
        self.current_age = self.current_age.saturating_add(1);
    }

    /// Reports whether the animal has reached the growth threshold.
    #[must_use]
    pub const fn is_time_to_grow_up(&self) -> bool {
        self.current_age >= GROWING_UP_TIME
    }

    /// Promotes the animal to an adult, gaining one point of speed.
    pub fn grow_up(&mut self) {
        self.age = AgeStage::Adult;
        self.speed += 1;
    }

    /// Reports whether the animal refuses portals into home zones.
    ///
    /// Capability flag set at construction; it replaces subtype checks for
    /// flying creatures in the portal rules.
    #[must_use]
    pub const fn avoids_home_portals(&self) -> bool {
        self.avoids_home_portals
    }

    /// Enables or disables the home-portal avoidance capability.
    pub fn set_avoids_home_portals(&mut self, avoids: bool) {
        self.avoids_home_portals = avoids;
    }

    /// Reports whether the animal is currently asleep.
    #[must_use]
    pub const fn is_sleeping(&self) -> bool {
        self.direction.is_sleeping()
    }
}
