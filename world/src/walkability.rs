//! Grid walkability oracle consulted before any position mutation.

use pet_haven_core::{Animal, CellCoord, Direction, PixelRect, ANIMAL_LAYER, CELL_SIZE};

use crate::{TileMap, ZoneKind};

/// Reports whether the animal may move one speed-increment in the provided
/// direction.
///
/// The probe extends one pixel beyond the actual step so a fast animal cannot
/// tunnel through a thin obstacle. Portals block movement only when the
/// animal is barred from the portal's destination zone or the portal leads
/// from the main map into a transitional zone.
#[must_use]
pub fn is_direction_walkable(map: &TileMap, animal: &Animal, direction: Direction) -> bool {
    let Some((dx, dy)) = direction.delta() else {
        return true;
    };

    let probe = animal.speed() + 1;
    let candidate = animal.rect().translated(dx * probe, dy * probe);

    for tile in map.tiles_on_layer(ANIMAL_LAYER) {
        if candidate.intersects(&PixelRect::from_cell(tile)) {
            return false;
        }
    }

    for portal in map.portals() {
        if !candidate.intersects(&portal.rect()) {
            continue;
        }
        if portal_blocks(map, animal, portal.destination_zone()) {
            return false;
        }
    }

    true
}

/// Cell-granularity twin of [`is_direction_walkable`] used by the route
/// planner.
#[must_use]
pub fn is_cell_walkable(map: &TileMap, animal: &Animal, cell: CellCoord) -> bool {
    if !map.contains_cell(cell) {
        return false;
    }
    if map.has_tile_at(ANIMAL_LAYER, cell) {
        return false;
    }
    if let Some(portal) = map.portal_at(cell) {
        if portal_blocks(map, animal, portal.destination_zone()) {
            return false;
        }
    }
    true
}

/// Reports whether the footprint sits within one zoomed tile of any portal.
///
/// Animals adjacent to a portal are exempt from the map's hard edge clamp so
/// they can cross; this is the only situation in which an out-of-bounds
/// position is tolerated transiently.
#[must_use]
pub fn is_near_portal(map: &TileMap, rect: PixelRect) -> bool {
    map.portals().iter().any(|portal| {
        let portal_rect = portal.rect();
        (portal_rect.x() - rect.x()).abs() <= CELL_SIZE
            && (portal_rect.y() - rect.y()).abs() <= CELL_SIZE
    })
}

/// Reports whether the footprint has left the map's pixel bounds entirely.
#[must_use]
pub fn is_outside_map(map: &TileMap, rect: PixelRect) -> bool {
    rect.x() < 0 || rect.y() < 0 || rect.x() > map.pixel_width() || rect.y() > map.pixel_height()
}

fn portal_blocks(map: &TileMap, animal: &Animal, destination_zone: ZoneKind) -> bool {
    if animal.avoids_home_portals() && destination_zone == ZoneKind::Home {
        return true;
    }
    map.zone() == ZoneKind::Main && destination_zone == ZoneKind::Transitional
}
