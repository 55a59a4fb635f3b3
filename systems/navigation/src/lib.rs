#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first route planner over a single map's grid.
//!
//! Planning is deterministic: neighbors expand in a fixed Down, Left, Up,
//! Right order and the first goal cell dequeued wins, so equidistant targets
//! always resolve the same way. A plan never fails loudly; when no target is
//! reachable the planner hands back an empty route and the caller falls
//! through to wandering.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use pet_haven_core::{Animal, CellCoord, Direction, Route, TargetSelector, CELL_SIZE};
use pet_haven_world::{is_cell_walkable, MapTopology, TileMap};

/// Fixed neighbor expansion order; changing it changes every planned route.
const NEIGHBOR_ORDER: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Up,
    Direction::Right,
];

/// Plans a shortest route from the animal's current cell to the nearest cell
/// satisfying the selector.
///
/// An existing unconsumed route is returned untouched; routes are never
/// regenerated mid-traversal. When the selector names a portal to a map
/// without a direct portal here, the topology supplies the next intermediate
/// map and the plan targets the matching portal instead. Unreachable or
/// absent targets yield an empty route.
#[must_use]
pub fn plan_route(
    map: &TileMap,
    topology: &MapTopology,
    animal: &Animal,
    selector: &TargetSelector,
) -> Route {
    if !animal.route().is_empty() {
        return animal.route().clone();
    }

    let Some(goal) = resolve_goal(map, topology, selector) else {
        return Route::new();
    };

    let start = animal.cell();
    if is_goal(map, &goal, start) {
        return Route::new();
    }

    let mut parents: BTreeMap<CellCoord, (CellCoord, Direction)> = BTreeMap::new();
    let mut visited: BTreeSet<CellCoord> = BTreeSet::new();
    let mut queue: VecDeque<CellCoord> = VecDeque::new();

    let _ = visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for direction in NEIGHBOR_ORDER {
            let next = current.step(direction);
            if !visited.insert(next) {
                continue;
            }
            // The goal cell itself is exempt from walkability so animals can
            // step onto portals and furnished cells.
            if is_goal(map, &goal, next) {
                return reconstruct(&parents, start, current, direction);
            }
            if !is_cell_walkable(map, animal, next) {
                continue;
            }
            let _ = parents.insert(next, (current, direction));
            queue.push_back(next);
        }
    }

    Route::new()
}

/// Pixels remaining until the footprint origin crosses the next cell boundary
/// in the provided direction.
///
/// Used to convert one route step into a direction hold duration. An origin
/// already sitting on a boundary needs a full cell of travel. Non-movement
/// directions need no travel at all.
#[must_use]
pub fn pixels_to_cell_boundary(direction: Direction, x: i32, y: i32) -> i32 {
    match direction {
        Direction::Left => {
            let offset = x.rem_euclid(CELL_SIZE);
            if offset == 0 {
                CELL_SIZE
            } else {
                offset
            }
        }
        Direction::Right => CELL_SIZE - x.rem_euclid(CELL_SIZE),
        Direction::Up => {
            let offset = y.rem_euclid(CELL_SIZE);
            if offset == 0 {
                CELL_SIZE
            } else {
                offset
            }
        }
        Direction::Down => CELL_SIZE - y.rem_euclid(CELL_SIZE),
        _ => 0,
    }
}

enum Goal {
    Cell(CellCoord),
    Food,
    Water,
    Pillow,
    Npc,
    NpcSpot,
    City,
}

fn resolve_goal(map: &TileMap, topology: &MapTopology, selector: &TargetSelector) -> Option<Goal> {
    match selector {
        TargetSelector::Food => Some(Goal::Food),
        TargetSelector::Water => Some(Goal::Water),
        TargetSelector::Pillow => Some(Goal::Pillow),
        TargetSelector::Npc => Some(Goal::Npc),
        TargetSelector::NpcSpot => Some(Goal::NpcSpot),
        TargetSelector::City => Some(Goal::City),
        TargetSelector::Portal(destination) => {
            let portal = map.portal_to(destination).or_else(|| {
                let hop = topology.next_hop(map.name(), destination)?;
                map.portal_to(&hop)
            });
            portal.map(|portal| Goal::Cell(portal.cell()))
        }
    }
}

fn is_goal(map: &TileMap, goal: &Goal, cell: CellCoord) -> bool {
    match goal {
        Goal::Cell(target) => *target == cell,
        Goal::Food => map.has_food_at(cell),
        Goal::Water => map.has_water_at(cell),
        Goal::Pillow => map.has_pillow_at(cell),
        Goal::Npc => map.has_npc_at(cell),
        Goal::NpcSpot => map.has_npc_spot_at(cell),
        Goal::City => map.has_city_at(cell),
    }
}

fn reconstruct(
    parents: &BTreeMap<CellCoord, (CellCoord, Direction)>,
    start: CellCoord,
    last: CellCoord,
    final_step: Direction,
) -> Route {
    let mut steps = vec![final_step];
    let mut cursor = last;
    while cursor != start {
        let (previous, step) = parents[&cursor];
        steps.push(step);
        cursor = previous;
    }
    steps.reverse();
    Route::from_steps(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_distance_from_mid_cell() {
        assert_eq!(pixels_to_cell_boundary(Direction::Right, 10, 0), 54);
        assert_eq!(pixels_to_cell_boundary(Direction::Left, 10, 0), 10);
        assert_eq!(pixels_to_cell_boundary(Direction::Down, 0, 70), 58);
        assert_eq!(pixels_to_cell_boundary(Direction::Up, 0, 70), 6);
    }

    #[test]
    fn boundary_distance_on_a_boundary_is_a_full_cell() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(
                pixels_to_cell_boundary(direction, CELL_SIZE * 2, CELL_SIZE * 3),
                CELL_SIZE
            );
        }
    }

    #[test]
    fn non_movement_directions_need_no_travel() {
        assert_eq!(pixels_to_cell_boundary(Direction::Stay, 10, 10), 0);
        assert_eq!(pixels_to_cell_boundary(Direction::SleepLeft, 10, 10), 0);
    }
}
