//! Arena-backed maze graph: nodes addressed by [`NodeId`], undirected [`Arc`]s
//! and per-direction neighbor slots.

pub mod arc;
pub mod node;

use logging_utils::{ActorType, log_internal_op, log_warning, warning_payload};
use rustc_hash::FxHashMap;
use strum::IntoEnumIterator;

use crate::utils::direction::Direction;
use crate::utils::types::NodeSummary;

pub use arc::{Arc, split_arc_name};
pub use node::{Node, NodeId};

/// A set of uniquely named nodes and the arcs between them.
///
/// Removed nodes leave a tombstone so that ids handed out earlier never
/// point at a different node.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Option<Node>>,
    names: FxHashMap<String, NodeId>,
    arcs: Vec<Arc>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` and returns its id. A node with the same name already present
    /// makes this a no-op.
    pub fn add_node(&mut self, mut node: Node) -> Option<NodeId> {
        let name = node.name().to_string();
        if self.names.contains_key(&name) {
            log_warning!(
                dir ActorType::Graph,
                0,
                warning_payload!("node already present", "nothing done", "add_node()", name)
            );
            return None;
        }
        let id = NodeId(self.nodes.len());
        node.id = Some(id);
        log_internal_op!(dir ActorType::Graph, 0,
            "action" => "node added",
            "node" => node.summary(),
            "signature" => node.signature(),
        );
        self.nodes.push(Some(node));
        self.names.insert(name, id);
        Some(id)
    }

    /// Connects `a` to `b` through `dir` on `a` and its opposite on `b`.
    ///
    /// Nothing happens if the nodes are the same, if they are already joined
    /// by an arc, or if either slot is not open.
    pub fn add_arc(&mut self, a: NodeId, dir: Direction, b: NodeId) -> bool {
        let (Some(node_a), Some(node_b)) = (self.node(a), self.node(b)) else {
            log_warning!(
                dir ActorType::Graph,
                0,
                warning_payload!("unknown endpoint", "nothing done", "add_arc()", a, b)
            );
            return false;
        };
        let (a_name, b_name) = (node_a.name().to_string(), node_b.name().to_string());

        if a == b {
            log_warning!(
                dir ActorType::Graph,
                0,
                warning_payload!("self loop", "nothing done", "add_arc()", a_name)
            );
            return false;
        }
        if self.contains_arc_between(&a_name, &b_name) {
            log_warning!(
                dir ActorType::Graph,
                0,
                warning_payload!("arc already present", "nothing done", "add_arc()", a_name, b_name)
            );
            return false;
        }
        if !node_a.is_open(dir) || !node_b.is_open(dir.opposite()) {
            log_warning!(
                dir ActorType::Graph,
                0,
                warning_payload!("slot not open", "nothing done", "add_arc()", a_name, b_name; "direction" => dir)
            );
            return false;
        }

        let connected = self.slot_mut(a).is_some_and(|node| node.connect(dir, b))
            && self.slot_mut(b).is_some_and(|node| node.connect(dir.opposite(), a));
        if !connected {
            return false;
        }

        let arc = Arc::new(a, &a_name, b, &b_name);
        log_internal_op!(dir ActorType::Graph, 0, "action" => "arc added", "arc" => arc.name(), "direction" => dir);
        self.arcs.push(arc);
        true
    }

    /// Removes the arc named `"A<-->B"` (either ordering) and clears both neighbor slots.
    pub fn remove_arc(&mut self, name: &str) -> bool {
        let Some(pos) = split_arc_name(name)
            .and_then(|(a, b)| self.arcs.iter().position(|arc| arc.joins(a, b)))
        else {
            log_warning!(
                dir ActorType::Graph,
                0,
                warning_payload!("arc not found", "nothing done", "remove_arc()", name)
            );
            return false;
        };
        let arc = self.arcs.remove(pos);
        let (a, b) = arc.endpoints();
        self.unlink(a, b);
        self.unlink(b, a);
        log_internal_op!(dir ActorType::Graph, 0, "action" => "arc removed", "arc" => arc.name());
        true
    }

    /// Removes a node together with every arc touching it.
    pub fn remove_node(&mut self, name: &str) -> Option<Node> {
        let Some(id) = self.names.get(name).copied() else {
            log_warning!(
                dir ActorType::Graph,
                0,
                warning_payload!("node not found", "nothing done", "remove_node()", name)
            );
            return None;
        };
        let touching: Vec<String> = self
            .arcs
            .iter()
            .filter(|arc| arc.touches(id))
            .map(Arc::name)
            .collect();
        for arc in touching {
            self.remove_arc(&arc);
        }
        self.names.remove(name);
        let removed = self.nodes.get_mut(id.0).and_then(Option::take);
        log_internal_op!(dir ActorType::Graph, 0, "action" => "node removed", "node" => name);
        removed
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Looks an arc up by name, accepting both `"A<-->B"` and `"B<-->A"`.
    pub fn contains_arc(&self, name: &str) -> bool {
        self.get_arc(name).is_some()
    }

    pub fn contains_arc_between(&self, a: &str, b: &str) -> bool {
        self.arcs.iter().any(|arc| arc.joins(a, b))
    }

    pub fn get_node(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn get_arc(&self, name: &str) -> Option<&Arc> {
        let (a, b) = split_arc_name(name)?;
        self.arcs.iter().find(|arc| arc.joins(a, b))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slot_mut(id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.get_node(name).and_then(|id| self.node(id))
    }

    pub fn neighbor(&self, id: NodeId, dir: Direction) -> Option<NodeId> {
        self.node(id)?.neighbor(dir)
    }

    /// The first node flagged as target.
    pub fn target(&self) -> Option<NodeId> {
        self.nodes().find(|(_, node)| node.is_target).map(|(id, _)| id)
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Live nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i), node)))
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn list_nodes(&self) -> Vec<NodeSummary> {
        self.nodes().map(|(_, node)| node.summary()).collect()
    }

    pub fn list_arcs(&self) -> Vec<(String, String)> {
        self.arcs
            .iter()
            .map(|arc| {
                let (a, b) = arc.endpoint_names();
                (a.to_string(), b.to_string())
            })
            .collect()
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn unlink(&mut self, from: NodeId, to: NodeId) {
        if let Some(node) = self.slot_mut(from) {
            for dir in Direction::iter() {
                if node.neighbor(dir) == Some(to) {
                    node.disconnect(dir);
                }
            }
        }
    }
}
