use logging_utils::{ActorType, LoggableActor};

use super::frame::GraphFrame;
use crate::components::graph::{Graph, NodeId};
use crate::utils::direction::Signature;
use crate::utils::types::{MapSnapshot, NodeSummary};

/// The cumulative map of an exploration session.
///
/// Its frame is fixed by the first merged run: that run's target node is
/// the anchor and keeps the coordinates it had in that run for the rest
/// of the session. Later runs only ever add to it.
#[derive(Debug, Clone, Default)]
pub struct MasterMap {
    pub(super) frame: GraphFrame,
    pub(super) anchor: Option<NodeId>,
    pub(super) anchor_coordinates: (i32, i32),
}

impl MasterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a master map from an already known graph whose target node is flagged.
    pub fn from_graph(graph: Graph) -> Self {
        let anchor = graph.target();
        let anchor_coordinates = anchor
            .and_then(|id| graph.node(id))
            .map(|node| node.coordinates())
            .unwrap_or_default();
        Self {
            frame: GraphFrame::from_graph(graph),
            anchor,
            anchor_coordinates,
        }
    }

    pub fn graph(&self) -> &Graph {
        self.frame.graph()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.graph().is_empty()
    }

    /// The target node every merge is anchored at.
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    pub fn anchor_coordinates(&self) -> Option<(i32, i32)> {
        self.anchor.map(|_| self.anchor_coordinates)
    }

    /// Non-target nodes with the given signature.
    pub fn candidates(&self, signature: &Signature) -> Vec<NodeId> {
        self.graph()
            .nodes()
            .filter(|(id, node)| Some(*id) != self.anchor && !node.is_target && &node.signature() == signature)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn target_summary(&self) -> Option<NodeSummary> {
        self.anchor
            .and_then(|id| self.graph().node(id))
            .map(|node| node.summary())
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            nodes: self.graph().list_nodes(),
            arcs: self.graph().list_arcs(),
            target: self.target_summary(),
        }
    }
}

impl LoggableActor for MasterMap {
    fn actor_type(&self) -> ActorType {
        ActorType::MapBuilder
    }

    fn actor_id(&self) -> u32 {
        0
    }
}
