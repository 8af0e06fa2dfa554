use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use strum::IntoEnumIterator;

use crate::components::graph::NodeId;
use crate::components::map_builder::MasterMap;
use crate::utils::direction::Direction;

impl MasterMap {
    /// Returns the directions of a shortest path from `from` to the anchor
    /// through explored arcs (every arc counts 1). The target is checked when
    /// a node is enqueued. Returns None if the anchor is not reachable.
    pub fn shortest_path(&self, from: NodeId) -> Option<Vec<Direction>> {
        let target = self.anchor()?;
        let graph = self.graph();
        graph.node(from)?;
        if from == target {
            return Some(Vec::new());
        }

        let mut queue = VecDeque::new();
        let mut visited = FxHashSet::default();
        // maps a node to its parent and the direction taken from it
        let mut parent_map: FxHashMap<NodeId, (NodeId, Direction)> = FxHashMap::default();

        queue.push_back(from);
        visited.insert(from);

        while let Some(current) = queue.pop_front() {
            let Some(node) = graph.node(current) else {
                continue;
            };
            for dir in Direction::iter() {
                if !node.was_explored(dir) {
                    continue;
                }
                let Some(next) = node.neighbor(dir) else {
                    continue;
                };
                if visited.insert(next) {
                    parent_map.insert(next, (current, dir));
                    if next == target {
                        return Some(reconstruct_path(&parent_map, target));
                    }
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// First direction of [`shortest_path`](Self::shortest_path), None when
    /// already on the target or cut off from it.
    pub fn shortest_direction(&self, from: NodeId) -> Option<Direction> {
        self.shortest_path(from)?.first().copied()
    }
}

fn reconstruct_path(parent_map: &FxHashMap<NodeId, (NodeId, Direction)>, target: NodeId) -> Vec<Direction> {
    let mut path = VecDeque::new();
    let mut curr = target;
    while let Some(&(parent, dir)) = parent_map.get(&curr) {
        path.push_front(dir);
        curr = parent;
    }
    path.into()
}
