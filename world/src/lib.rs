#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative map surfaces and roster ownership for Pet Haven.
//!
//! The [`Sanctuary`] owns every tile map together with its animal roster;
//! there are no ambient singletons. Systems consult the walkability oracle
//! and the map topology exposed here, and mutate interactable objects only
//! through the typed callbacks on [`TileMap`].

use std::collections::{BTreeMap, BTreeSet};

use pet_haven_core::{
    Animal, AnimalId, CellCoord, MapName, PixelRect, CELL_SIZE,
};
use thiserror::Error;

mod topology;
mod walkability;

pub use topology::MapTopology;
pub use walkability::{
    is_cell_walkable, is_direction_walkable, is_near_portal, is_outside_map,
};

/// Structural errors raised while assembling map surfaces.
///
/// These are configuration-time failures reported to the host at load time;
/// the tick path never produces them.
#[derive(Debug, Error)]
pub enum MapError {
    /// A map was declared with zero-sized dimensions.
    #[error("map {name} has invalid dimensions {width}x{height}")]
    ZeroSized {
        /// Name of the offending map.
        name: MapName,
        /// Declared width in tiles.
        width: i32,
        /// Declared height in tiles.
        height: i32,
    },
    /// A map with the same name is already registered.
    #[error("map {0} is already registered")]
    Duplicate(MapName),
    /// The referenced map is not registered.
    #[error("unknown map {0}")]
    Unknown(MapName),
}

/// Classification of a map used by the portal rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneKind {
    /// The central map every animal can reach.
    Main,
    /// An ordinary outdoor map.
    Standard,
    /// An indoor home map; avoided by animals with the home-portal
    /// capability flag.
    Home,
    /// A transitional edge zone animals should not linger in.
    Transitional,
}

/// A tagged map-edge tile that teleports an animal to a named destination
/// map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Portal {
    cell: CellCoord,
    destination: MapName,
    destination_zone: ZoneKind,
}

impl Portal {
    /// Creates a portal at the provided cell leading to the named map.
    #[must_use]
    pub const fn new(cell: CellCoord, destination: MapName, destination_zone: ZoneKind) -> Self {
        Self {
            cell,
            destination,
            destination_zone,
        }
    }

    /// Cell occupied by the portal.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Name of the map the portal leads to.
    #[must_use]
    pub const fn destination(&self) -> &MapName {
        &self.destination
    }

    /// Zone classification of the destination map.
    #[must_use]
    pub const fn destination_zone(&self) -> ZoneKind {
        self.destination_zone
    }

    /// Pixel rectangle covered by the portal tile.
    #[must_use]
    pub const fn rect(&self) -> PixelRect {
        PixelRect::from_cell(self.cell)
    }
}

/// A food or water bowl placed on a map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bowl {
    cell: CellCoord,
    full: bool,
}

impl Bowl {
    /// Creates a bowl at the provided cell with the given fullness.
    #[must_use]
    pub const fn new(cell: CellCoord, full: bool) -> Self {
        Self { cell, full }
    }

    /// Cell occupied by the bowl.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Reports whether the bowl currently holds a portion.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.full
    }

    /// Empties the bowl after consumption.
    pub fn empty(&mut self) {
        self.full = false;
    }

    /// Refills the bowl; a host-side operation.
    pub fn refill(&mut self) {
        self.full = true;
    }
}

/// One queryable tile map: layered collision tiles, portals, and
/// interactable objects.
#[derive(Clone, Debug)]
pub struct TileMap {
    name: MapName,
    width: i32,
    height: i32,
    zone: ZoneKind,
    layered_tiles: BTreeMap<i32, BTreeSet<CellCoord>>,
    portals: Vec<Portal>,
    food_items: Vec<CellCoord>,
    food_bowls: Vec<Bowl>,
    water_bowls: Vec<Bowl>,
    pillows: BTreeSet<CellCoord>,
    npcs: BTreeSet<CellCoord>,
    npc_spots: BTreeSet<CellCoord>,
    city_cells: BTreeSet<CellCoord>,
}

impl TileMap {
    /// Creates an empty map surface with the provided dimensions in tiles.
    ///
    /// Zero or negative dimensions are a configuration error surfaced at
    /// load time.
    pub fn new(name: MapName, width: i32, height: i32, zone: ZoneKind) -> Result<Self, MapError> {
        if width <= 0 || height <= 0 {
            return Err(MapError::ZeroSized {
                name,
                width,
                height,
            });
        }
        Ok(Self {
            name,
            width,
            height,
            zone,
            layered_tiles: BTreeMap::new(),
            portals: Vec::new(),
            food_items: Vec::new(),
            food_bowls: Vec::new(),
            water_bowls: Vec::new(),
            pillows: BTreeSet::new(),
            npcs: BTreeSet::new(),
            npc_spots: BTreeSet::new(),
            city_cells: BTreeSet::new(),
        })
    }

    /// Name identifying the map.
    #[must_use]
    pub const fn name(&self) -> &MapName {
        &self.name
    }

    /// Width of the map in tiles.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the map in tiles.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Zone classification of the map.
    #[must_use]
    pub const fn zone(&self) -> ZoneKind {
        self.zone
    }

    /// Total width of the map in pixels.
    #[must_use]
    pub const fn pixel_width(&self) -> i32 {
        self.width * CELL_SIZE
    }

    /// Total height of the map in pixels.
    #[must_use]
    pub const fn pixel_height(&self) -> i32 {
        self.height * CELL_SIZE
    }

    /// Pixel position at the center of the map, used by stuck recovery.
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.pixel_width() / 2, self.pixel_height() / 2)
    }

    /// Reports whether the cell lies within the map bounds.
    #[must_use]
    pub const fn contains_cell(&self, cell: CellCoord) -> bool {
        cell.column() >= 0 && cell.column() < self.width && cell.row() >= 0 && cell.row() < self.height
    }

    /// Adds a collision tile on the provided layer.
    pub fn add_collision_tile(&mut self, layer: i32, cell: CellCoord) {
        let _ = self
            .layered_tiles
            .entry(layer)
            .or_default()
            .insert(cell);
    }

    /// Removes a collision tile from the provided layer; host map edits.
    pub fn remove_collision_tile(&mut self, layer: i32, cell: CellCoord) {
        if let Some(tiles) = self.layered_tiles.get_mut(&layer) {
            let _ = tiles.remove(&cell);
        }
    }

    /// Iterates the collision tiles on the provided layer.
    ///
    /// A missing layer behaves as an empty one.
    pub fn tiles_on_layer(&self, layer: i32) -> impl Iterator<Item = CellCoord> + '_ {
        self.layered_tiles
            .get(&layer)
            .into_iter()
            .flat_map(|tiles| tiles.iter().copied())
    }

    /// Reports whether a collision tile occupies the cell on the layer.
    #[must_use]
    pub fn has_tile_at(&self, layer: i32, cell: CellCoord) -> bool {
        self.layered_tiles
            .get(&layer)
            .is_some_and(|tiles| tiles.contains(&cell))
    }

    /// Registers a portal on the map.
    pub fn add_portal(&mut self, portal: Portal) {
        self.portals.push(portal);
    }

    /// Portals registered on the map.
    #[must_use]
    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    /// Portal occupying the provided cell, if any.
    #[must_use]
    pub fn portal_at(&self, cell: CellCoord) -> Option<&Portal> {
        self.portals.iter().find(|portal| portal.cell() == cell)
    }

    /// First portal leading to the named map, if any.
    #[must_use]
    pub fn portal_to(&self, destination: &MapName) -> Option<&Portal> {
        self.portals
            .iter()
            .find(|portal| portal.destination() == destination)
    }

    /// Drops a loose food item on the provided cell.
    pub fn place_food(&mut self, cell: CellCoord) {
        self.food_items.push(cell);
    }

    /// Places a food bowl on the provided cell.
    pub fn place_food_bowl(&mut self, cell: CellCoord, full: bool) {
        self.food_bowls.push(Bowl::new(cell, full));
    }

    /// Places a water bowl on the provided cell.
    pub fn place_water_bowl(&mut self, cell: CellCoord, full: bool) {
        self.water_bowls.push(Bowl::new(cell, full));
    }

    /// Places a pillow on the provided cell.
    pub fn place_pillow(&mut self, cell: CellCoord) {
        let _ = self.pillows.insert(cell);
    }

    /// Marks the cell as occupied by an NPC.
    pub fn add_npc(&mut self, cell: CellCoord) {
        let _ = self.npcs.insert(cell);
    }

    /// Marks the cell as an NPC waiting spot.
    pub fn add_npc_spot(&mut self, cell: CellCoord) {
        let _ = self.npc_spots.insert(cell);
    }

    /// Marks the cell as part of the city landmark.
    pub fn add_city_cell(&mut self, cell: CellCoord) {
        let _ = self.city_cells.insert(cell);
    }

    /// Food bowls registered on the map.
    #[must_use]
    pub fn food_bowls(&self) -> &[Bowl] {
        &self.food_bowls
    }

    /// Water bowls registered on the map.
    #[must_use]
    pub fn water_bowls(&self) -> &[Bowl] {
        &self.water_bowls
    }

    /// Pillow cells registered on the map.
    pub fn pillows(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.pillows.iter().copied()
    }

    /// Reports whether an edible source occupies the cell: a loose food item
    /// or a full food bowl.
    #[must_use]
    pub fn has_food_at(&self, cell: CellCoord) -> bool {
        self.food_items.contains(&cell)
            || self
                .food_bowls
                .iter()
                .any(|bowl| bowl.is_full() && bowl.cell() == cell)
    }

    /// Reports whether a full water bowl occupies the cell.
    #[must_use]
    pub fn has_water_at(&self, cell: CellCoord) -> bool {
        self.water_bowls
            .iter()
            .any(|bowl| bowl.is_full() && bowl.cell() == cell)
    }

    /// Reports whether a pillow occupies the cell.
    #[must_use]
    pub fn has_pillow_at(&self, cell: CellCoord) -> bool {
        self.pillows.contains(&cell)
    }

    /// Reports whether an NPC occupies the cell.
    #[must_use]
    pub fn has_npc_at(&self, cell: CellCoord) -> bool {
        self.npcs.contains(&cell)
    }

    /// Reports whether the cell is an NPC waiting spot.
    #[must_use]
    pub fn has_npc_spot_at(&self, cell: CellCoord) -> bool {
        self.npc_spots.contains(&cell)
    }

    /// Reports whether the cell belongs to the city landmark.
    #[must_use]
    pub fn has_city_at(&self, cell: CellCoord) -> bool {
        self.city_cells.contains(&cell)
    }

    /// Consumes an edible source at the cell: removes a loose food item or
    /// empties a full food bowl. Returns whether anything was eaten.
    pub fn consume_food_at(&mut self, cell: CellCoord) -> bool {
        if let Some(index) = self.food_items.iter().position(|item| *item == cell) {
            let _ = self.food_items.remove(index);
            return true;
        }
        if let Some(bowl) = self
            .food_bowls
            .iter_mut()
            .find(|bowl| bowl.is_full() && bowl.cell() == cell)
        {
            bowl.empty();
            return true;
        }
        false
    }

    /// Empties a full water bowl at the cell. Returns whether anything was
    /// drunk.
    pub fn drink_water_at(&mut self, cell: CellCoord) -> bool {
        if let Some(bowl) = self
            .water_bowls
            .iter_mut()
            .find(|bowl| bowl.is_full() && bowl.cell() == cell)
        {
            bowl.empty();
            return true;
        }
        false
    }

    /// Refills the food bowl at the cell, if one exists.
    pub fn refill_food_bowl_at(&mut self, cell: CellCoord) -> bool {
        if let Some(bowl) = self.food_bowls.iter_mut().find(|bowl| bowl.cell() == cell) {
            bowl.refill();
            return true;
        }
        false
    }

    /// Refills the water bowl at the cell, if one exists.
    pub fn refill_water_bowl_at(&mut self, cell: CellCoord) -> bool {
        if let Some(bowl) = self.water_bowls.iter_mut().find(|bowl| bowl.cell() == cell) {
            bowl.refill();
            return true;
        }
        false
    }
}

/// Owns every map surface and its animal roster.
///
/// A single context replaces the original's global mutable lists; all roster
/// and map access flows through it.
#[derive(Debug)]
pub struct Sanctuary {
    main_map: MapName,
    maps: BTreeMap<MapName, TileMap>,
    rosters: BTreeMap<MapName, Vec<Animal>>,
    topology: MapTopology,
}

impl Sanctuary {
    /// Creates an empty sanctuary whose central map carries the provided
    /// name.
    #[must_use]
    pub fn new(main_map: MapName) -> Self {
        Self {
            main_map,
            maps: BTreeMap::new(),
            rosters: BTreeMap::new(),
            topology: MapTopology::default(),
        }
    }

    /// Name of the central map animals gravitate toward.
    #[must_use]
    pub const fn main_map(&self) -> &MapName {
        &self.main_map
    }

    /// Registers a map surface, creating an empty roster for it.
    pub fn insert_map(&mut self, map: TileMap) -> Result<(), MapError> {
        let name = map.name().clone();
        if self.maps.contains_key(&name) {
            return Err(MapError::Duplicate(name));
        }
        let _ = self.maps.insert(name.clone(), map);
        let _ = self.rosters.insert(name, Vec::new());
        self.topology = MapTopology::from_maps(&self.maps);
        Ok(())
    }

    /// Read-only access to the named map surface.
    #[must_use]
    pub fn map(&self, name: &MapName) -> Option<&TileMap> {
        self.maps.get(name)
    }

    /// Portal graph spanning every registered map.
    #[must_use]
    pub const fn topology(&self) -> &MapTopology {
        &self.topology
    }

    /// Map names in deterministic order.
    pub fn map_names(&self) -> impl Iterator<Item = &MapName> {
        self.maps.keys()
    }

    /// Adds an animal to the roster of its current map.
    pub fn spawn(&mut self, animal: Animal) -> Result<(), MapError> {
        let map = animal.current_map().clone();
        match self.rosters.get_mut(&map) {
            Some(roster) => {
                roster.push(animal);
                Ok(())
            }
            None => Err(MapError::Unknown(map)),
        }
    }

    /// Removes an animal from whichever roster holds it.
    ///
    /// Used for adoption handoff and deletion; the core never removes an
    /// animal on its own initiative.
    pub fn remove(&mut self, id: AnimalId) -> Option<Animal> {
        for roster in self.rosters.values_mut() {
            if let Some(index) = roster.iter().position(|animal| animal.id() == id) {
                return Some(roster.remove(index));
            }
        }
        None
    }

    /// Roster of the named map, empty when the map is unknown.
    #[must_use]
    pub fn roster(&self, name: &MapName) -> &[Animal] {
        self.rosters.get(name).map_or(&[], Vec::as_slice)
    }

    /// Total number of animals across all rosters.
    #[must_use]
    pub fn animal_count(&self) -> usize {
        self.rosters.values().map(Vec::len).sum()
    }

    /// Splits out mutable access to one map surface and its roster.
    ///
    /// The host tick loop needs both halves at once: the behavior system
    /// mutates animals and consumes map resources within the same tick.
    pub fn map_and_roster_mut(
        &mut self,
        name: &MapName,
    ) -> Option<(&mut TileMap, &mut Vec<Animal>)> {
        let Self { maps, rosters, .. } = self;
        match (maps.get_mut(name), rosters.get_mut(name)) {
            (Some(map), Some(roster)) => Some((map, roster)),
            _ => None,
        }
    }

    /// Moves an animal to the named destination map after a portal crossing.
    ///
    /// The spawn point is one cell inward from the reciprocal portal on the
    /// destination map when one exists, otherwise the map center. Spawning
    /// off the portal tile keeps the arrival from immediately counting as
    /// another crossing. The animal's route is cleared before repositioning.
    pub fn relocate(&mut self, id: AnimalId, destination: &MapName) -> Result<(), MapError> {
        if !self.maps.contains_key(destination) {
            return Err(MapError::Unknown(destination.clone()));
        }

        let Some(mut animal) = self.remove(id) else {
            return Ok(());
        };

        let origin = animal.current_map().clone();
        let spawn = {
            let map = &self.maps[destination];
            match map.portal_to(&origin) {
                Some(portal) => {
                    let cell = interior_neighbor(map, portal.cell());
                    (cell.column() * CELL_SIZE, cell.row() * CELL_SIZE)
                }
                None => map.center(),
            }
        };

        animal.route_mut().clear();
        animal.move_to(spawn.0, spawn.1);
        animal.set_current_map(destination.clone());
        tracing::info!(
            animal = animal.id().get(),
            from = %origin,
            to = %destination,
            "animal crossed portal"
        );

        match self.rosters.get_mut(destination) {
            Some(roster) => {
                roster.push(animal);
                Ok(())
            }
            None => Err(MapError::Unknown(destination.clone())),
        }
    }
}

/// Pushes an edge cell one step toward the map interior.
///
/// Portals sit on map edges; an animal arriving through one must land beside
/// it, not on it.
fn interior_neighbor(map: &TileMap, cell: CellCoord) -> CellCoord {
    let mut column = cell.column();
    let mut row = cell.row();
    if column <= 0 {
        column += 1;
    } else if column >= map.width() - 1 {
        column -= 1;
    }
    if row <= 0 {
        row += 1;
    } else if row >= map.height() - 1 {
        row -= 1;
    }
    CellCoord::new(column, row)
}

/// Query functions that provide read-only snapshots of the sanctuary.
pub mod query {
    use pet_haven_core::{AgeStage, AnimalId, CellCoord, Direction, MapName};

    use super::Sanctuary;

    /// Immutable representation of a single animal's state used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct AnimalSnapshot {
        /// Unique identifier assigned to the animal.
        pub id: AnimalId,
        /// Species name of the animal.
        pub species: String,
        /// Map the animal currently inhabits.
        pub map: MapName,
        /// Grid cell currently occupied by the animal.
        pub cell: CellCoord,
        /// Direction active for the most recent tick.
        pub direction: Direction,
        /// Hunger as a truncated percentage.
        pub hunger_percent: i32,
        /// Thirst as a truncated percentage.
        pub thirst_percent: i32,
        /// Energy as a truncated percentage.
        pub energy_percent: i32,
        /// Growth stage of the animal.
        pub age: AgeStage,
    }

    /// Read-only snapshot describing every animal in the sanctuary.
    #[derive(Clone, Debug, Default)]
    pub struct AnimalView {
        snapshots: Vec<AnimalSnapshot>,
    }

    impl AnimalView {
        /// Iterator over the captured snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &AnimalSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<AnimalSnapshot> {
            self.snapshots
        }
    }

    /// Captures a view of every animal across all rosters, sorted by id.
    #[must_use]
    pub fn animal_view(sanctuary: &Sanctuary) -> AnimalView {
        let mut snapshots: Vec<AnimalSnapshot> = sanctuary
            .rosters
            .values()
            .flatten()
            .map(|animal| AnimalSnapshot {
                id: animal.id(),
                species: animal.species().to_owned(),
                map: animal.current_map().clone(),
                cell: animal.cell(),
                direction: animal.direction(),
                hunger_percent: animal.needs().hunger_percent(),
                thirst_percent: animal.needs().thirst_percent(),
                energy_percent: animal.needs().energy_percent(),
                age: animal.age(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        AnimalView { snapshots }
    }
}
