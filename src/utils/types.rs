use std::fmt;

use crate::utils::direction::Direction;

/// Name of the `index`-th node discovered in a graph frame.
///
/// Names follow the alphabet `A`..`Z`, then continue as `A2`..`Z2`, `A3`, ...
pub fn node_name(index: usize) -> String {
    let letter = char::from(b'A' + (index % 26) as u8);
    match index / 26 {
        0 => letter.to_string(),
        round => format!("{}{}", letter, round + 1),
    }
}

/// A node as reported for diagnostics: its name and coordinates in the owning frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeSummary {
    pub name: String,
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for NodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{},{}]", self.name, self.x, self.y)
    }
}

/// Introspection view of a map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapSnapshot {
    pub nodes: Vec<NodeSummary>,
    /// Arcs as `(endpoint, endpoint)` names.
    pub arcs: Vec<(String, String)>,
    pub target: Option<NodeSummary>,
}

impl MapSnapshot {
    pub fn node(&self, name: &str) -> Option<&NodeSummary> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn has_arc(&self, a: &str, b: &str) -> bool {
        self.arcs
            .iter()
            .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

/// Outcome of one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// 1-based index of the run inside the session.
    pub run_index: usize,
    /// Name of the run's start node in the maze being walked, when the oracle knows it.
    pub start: Option<String>,
    /// Directions physically travelled, backtracking included.
    pub moves: Vec<Direction>,
    pub learned_nodes: usize,
    pub learned_arcs: usize,
    pub master_nodes: usize,
    pub master_arcs: usize,
    pub anchor: Option<NodeSummary>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run {}: {} moves, +{} nodes, +{} arcs, master {} nodes / {} arcs",
            self.run_index,
            self.moves.len(),
            self.learned_nodes,
            self.learned_arcs,
            self.master_nodes,
            self.master_arcs
        )?;
        if let Some(anchor) = &self.anchor {
            write!(f, ", target {}", anchor)?;
        }
        Ok(())
    }
}
