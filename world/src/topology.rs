//! Portal graph used to chain routes across maps.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use pet_haven_core::MapName;

use crate::TileMap;

/// Adjacency over maps induced by their portal destinations.
///
/// Cross-map routing never searches tile grids of other maps; it resolves
/// the next intermediate map here and plans only to the matching portal on
/// the current map.
#[derive(Clone, Debug, Default)]
pub struct MapTopology {
    edges: BTreeMap<MapName, BTreeSet<MapName>>,
}

impl MapTopology {
    /// Builds the topology from every registered map's portal list.
    #[must_use]
    pub fn from_maps(maps: &BTreeMap<MapName, TileMap>) -> Self {
        let mut edges: BTreeMap<MapName, BTreeSet<MapName>> = BTreeMap::new();
        for (name, map) in maps {
            let entry = edges.entry(name.clone()).or_default();
            for portal in map.portals() {
                let _ = entry.insert(portal.destination().clone());
            }
        }
        Self { edges }
    }

    /// Maps directly reachable from the provided map.
    pub fn neighbors(&self, map: &MapName) -> impl Iterator<Item = &MapName> {
        self.edges.get(map).into_iter().flatten()
    }

    /// Next intermediate map on a shortest portal path from `from` to `to`.
    ///
    /// Returns `None` when the maps coincide or no portal path exists.
    /// Deterministic: neighbors expand in lexicographic map-name order.
    #[must_use]
    pub fn next_hop(&self, from: &MapName, to: &MapName) -> Option<MapName> {
        if from == to {
            return None;
        }

        let mut first_hop: BTreeMap<&MapName, &MapName> = BTreeMap::new();
        let mut visited: BTreeSet<&MapName> = BTreeSet::new();
        let mut queue: VecDeque<&MapName> = VecDeque::new();

        let _ = visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.neighbors(current) {
                if !visited.insert(neighbor) {
                    continue;
                }
                let hop = if current == from {
                    neighbor
                } else {
                    first_hop[current]
                };
                if neighbor == to {
                    return Some(hop.clone());
                }
                let _ = first_hop.insert(neighbor, hop);
                queue.push_back(neighbor);
            }
        }

        None
    }
}
