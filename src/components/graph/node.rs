use logging_utils::{ActorType, log_warning, warning_payload};

use crate::utils::direction::{Direction, Exits, Signature};
use crate::utils::types::NodeSummary;

/// Stable index of a node inside the [`Graph`](super::Graph) arena that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A single intersection.
///
/// Exit flags are fixed at creation. Explored flags only ever go from
/// `false` to `true`, and a neighbor slot is filled only once its exit has
/// been explored.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: Option<NodeId>,
    name: String,
    exits: Exits,
    explored: [bool; 4],
    neighbors: [Option<NodeId>; 4],
    pub x: i32,
    pub y: i32,
    pub is_target: bool,
    pub cost: u32,
}

impl Node {
    pub fn new(name: impl Into<String>, exits: Exits) -> Self {
        Self {
            id: None,
            name: name.into(),
            exits,
            explored: [false; 4],
            neighbors: [None; 4],
            x: 0,
            y: 0,
            is_target: false,
            cost: 0,
        }
    }

    /// Same node placed at `(x, y)`.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Arena id, `None` until the node is added to a graph.
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exits(&self) -> Exits {
        self.exits
    }

    pub fn has_exit(&self, dir: Direction) -> bool {
        self.exits.has(dir)
    }

    /// The exit exists and nothing is connected through it yet.
    pub fn is_open(&self, dir: Direction) -> bool {
        self.has_exit(dir) && self.neighbors[dir.index()].is_none()
    }

    /// Links `neighbor` through the exit in `dir`.
    ///
    /// Rejected (with a warning) when the exit does not exist or when
    /// `neighbor` is this very node.
    pub fn connect(&mut self, dir: Direction, neighbor: NodeId) -> bool {
        let name = &self.name;
        if self.id == Some(neighbor) {
            log_warning!(
                dir ActorType::Graph,
                0,
                warning_payload!("node cannot be connected to itself", "nothing done", "connect()", name; "direction" => dir)
            );
            return false;
        }
        if !self.has_exit(dir) {
            log_warning!(
                dir ActorType::Graph,
                0,
                warning_payload!("no exit in this direction", "nothing done", "connect()", name; "direction" => dir)
            );
            return false;
        }
        self.neighbors[dir.index()] = Some(neighbor);
        self.explored[dir.index()] = true;
        true
    }

    /// Clears the neighbor slot. The explored flag stays set.
    pub fn disconnect(&mut self, dir: Direction) -> Option<NodeId> {
        self.neighbors[dir.index()].take()
    }

    pub fn mark_explored(&mut self, dir: Direction) {
        self.explored[dir.index()] = true;
    }

    pub fn was_explored(&self, dir: Direction) -> bool {
        self.explored[dir.index()]
    }

    pub fn neighbor(&self, dir: Direction) -> Option<NodeId> {
        self.neighbors[dir.index()]
    }

    /// Direction through which `other` is connected, if any.
    pub fn direction_to(&self, other: NodeId) -> Option<Direction> {
        use strum::IntoEnumIterator;
        Direction::iter().find(|dir| self.neighbors[dir.index()] == Some(other))
    }

    pub fn signature(&self) -> Signature {
        self.exits.signature()
    }

    pub fn coordinates(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            name: self.name.clone(),
            x: self.x,
            y: self.y,
        }
    }
}
