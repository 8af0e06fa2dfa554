use logging_utils::{ActorType, log_internal_op, log_warning, warning_payload};
use rustc_hash::FxHashMap;

use crate::components::graph::{Graph, Node, NodeId};
use crate::utils::direction::{Direction, Exits};
use crate::utils::types::node_name;

/// How an arrival was folded into a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalKind {
    /// First node of a run, placed at (0,0).
    Origin,
    /// Came back along an arc that was already known.
    KnownArc,
    /// Reached a known node through a new arc.
    NewArc,
    /// Discovered a new intersection.
    NewNode,
    /// Nothing moved since the last recording.
    Repeat,
}

/// A graph together with its coordinate frame: which cell holds which node
/// and which name comes next.
#[derive(Debug, Clone, Default)]
pub struct GraphFrame {
    pub(crate) graph: Graph,
    issued: FxHashMap<(i32, i32), NodeId>,
    next_name: usize,
}

impl GraphFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing graph, registering every node at its coordinates.
    pub fn from_graph(graph: Graph) -> Self {
        let issued = graph
            .nodes()
            .map(|(id, node)| (node.coordinates(), id))
            .collect();
        let next_name = graph.node_count();
        Self {
            graph,
            issued,
            next_name,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn is_issued(&self, coordinates: (i32, i32)) -> bool {
        self.issued.contains_key(&coordinates)
    }

    pub fn node_at(&self, coordinates: (i32, i32)) -> Option<NodeId> {
        self.issued.get(&coordinates).copied()
    }

    /// Creates a node with the next free name at `coordinates`.
    pub fn spawn(&mut self, exits: Exits, coordinates: (i32, i32)) -> Option<NodeId> {
        if let Some(existing) = self.node_at(coordinates) {
            log_warning!(
                dir ActorType::MapBuilder,
                0,
                warning_payload!("coordinates already issued", "existing node returned", "spawn()", coordinates)
            );
            return Some(existing);
        }
        let mut name = node_name(self.next_name);
        while self.graph.contains_node(&name) {
            self.next_name += 1;
            name = node_name(self.next_name);
        }
        self.next_name += 1;

        let (x, y) = coordinates;
        let id = self.graph.add_node(Node::new(name, exits).at(x, y))?;
        self.issued.insert(coordinates, id);
        Some(id)
    }

    /// Folds the arrival at the cell next to `prev` in direction `dir` into the frame.
    ///
    /// * cell known and `prev`'s exit already explored: plain revisit
    /// * cell known but exit unexplored: the two nodes get a new arc
    /// * unknown cell: a new node is created from `exits` and connected
    pub fn arrive(&mut self, prev: NodeId, dir: Direction, exits: Exits) -> Option<(NodeId, ArrivalKind)> {
        let prev_node = self.graph.node(prev)?;
        let coordinates = dir.step_from(prev_node.coordinates());
        let already_explored = prev_node.was_explored(dir);

        match self.node_at(coordinates) {
            Some(existing) if already_explored => Some((existing, ArrivalKind::KnownArc)),
            Some(existing) => {
                self.mark(prev, dir);
                self.graph.add_arc(prev, dir, existing);
                self.mark(existing, dir.opposite());
                log_internal_op!(dir ActorType::MapBuilder, 0,
                    "arrival" => "new arc",
                    "node" => self.name_of(existing),
                    "direction" => dir,
                );
                Some((existing, ArrivalKind::NewArc))
            }
            None => {
                self.mark(prev, dir);
                let id = self.spawn(exits, coordinates)?;
                self.mark(id, dir.opposite());
                self.graph.add_arc(prev, dir, id);
                log_internal_op!(dir ActorType::MapBuilder, 0,
                    "arrival" => "new node",
                    "node" => self.name_of(id),
                    "direction" => dir,
                );
                Some((id, ArrivalKind::NewNode))
            }
        }
    }

    fn mark(&mut self, id: NodeId, dir: Direction) {
        if let Some(node) = self.graph.node_mut(id) {
            node.mark_explored(dir);
        }
    }

    pub(crate) fn name_of(&self, id: NodeId) -> String {
        self.graph
            .node(id)
            .map(|node| node.name().to_string())
            .unwrap_or_default()
    }
}
