use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::components::graph::{Graph, Node};
use crate::utils::direction::{Direction, Exits};
use crate::utils::error::ExplorerError;

use Direction::{East, North, South, West};

/// The demonstration mazes a session can explore.
#[derive(Debug, EnumIter, Display, EnumString, Eq, PartialEq, Hash, Clone, Copy, Default)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum MazeKind {
    /// 5x5 maze with one loop, target in the middle.
    #[default]
    Labyrinth,
    Corridor,
    DeadEndSquare,
    Loop,
}

impl MazeKind {
    pub fn random() -> Self {
        let mut rng = rand::rng();
        let variants: Vec<MazeKind> = MazeKind::iter().collect();
        variants.choose(&mut rng).copied().unwrap_or_default()
    }

    pub fn layout(self) -> Result<&'static MazeLayout, ExplorerError> {
        MAZE_REGISTRY
            .get(&self)
            .ok_or_else(|| ExplorerError::UnknownLayout(self.to_string()))
    }
}

/// Static description of a maze: nodes with their exit letters and grid
/// cell, arcs as `(from, direction, to)`.
#[derive(Debug, Clone, Copy)]
pub struct MazeLayout {
    pub nodes: &'static [(&'static str, &'static str, (i32, i32))],
    pub arcs: &'static [(&'static str, Direction, &'static str)],
    pub target: &'static str,
    pub start: &'static str,
}

impl MazeLayout {
    /// Builds the maze graph, failing on any arc the exits do not allow.
    pub fn build(&self) -> Result<Graph, ExplorerError> {
        let mut graph = Graph::new();
        for (name, exits, (x, y)) in self.nodes {
            let mut node = Node::new(*name, Exits::from_letters(exits)).at(*x, *y);
            node.is_target = *name == self.target;
            graph
                .add_node(node)
                .ok_or_else(|| ExplorerError::InvalidLayout(format!("duplicate node {name}")))?;
        }
        for (from, dir, to) in self.arcs {
            let a = graph
                .get_node(from)
                .ok_or_else(|| ExplorerError::InvalidLayout(format!("unknown node {from}")))?;
            let b = graph
                .get_node(to)
                .ok_or_else(|| ExplorerError::InvalidLayout(format!("unknown node {to}")))?;
            if !graph.add_arc(a, *dir, b) {
                return Err(ExplorerError::InvalidLayout(format!("cannot connect {from} {dir} to {to}")));
            }
        }
        if graph.target().is_none() {
            return Err(ExplorerError::InvalidLayout(format!("unknown target {}", self.target)));
        }
        if !graph.contains_node(self.start) {
            return Err(ExplorerError::InvalidLayout(format!("unknown start {}", self.start)));
        }
        Ok(graph)
    }
}

const LABYRINTH: MazeLayout = MazeLayout {
    nodes: &[
        ("A", "S", (0, 0)),
        ("B", "E", (1, 0)),
        ("C", "ESW", (2, 0)),
        ("D", "W", (3, 0)),
        ("E", "S", (4, 0)),
        ("F", "NS", (0, -1)),
        ("G", "ES", (1, -1)),
        ("H", "NESW", (2, -1)),
        ("I", "SW", (3, -1)),
        ("J", "NS", (4, -1)),
        ("K", "NES", (0, -2)),
        ("L", "NSW", (1, -2)),
        ("M", "N", (2, -2)),
        ("N", "NES", (3, -2)),
        ("O", "NSW", (4, -2)),
        ("P", "NS", (0, -3)),
        ("Q", "NE", (1, -3)),
        ("R", "ESW", (2, -3)),
        ("S", "NW", (3, -3)),
        ("T", "NS", (4, -3)),
        ("U", "N", (0, -4)),
        ("V", "E", (1, -4)),
        ("W", "NEW", (2, -4)),
        ("X", "W", (3, -4)),
        ("Y", "N", (4, -4)),
    ],
    arcs: &[
        ("A", South, "F"),
        ("B", East, "C"),
        ("C", East, "D"),
        ("C", South, "H"),
        ("E", South, "J"),
        ("F", South, "K"),
        ("G", East, "H"),
        ("G", South, "L"),
        ("H", East, "I"),
        ("H", South, "M"),
        ("I", South, "N"),
        ("J", South, "O"),
        ("K", East, "L"),
        ("K", South, "P"),
        ("L", South, "Q"),
        ("N", East, "O"),
        ("N", South, "S"),
        ("O", South, "T"),
        ("P", South, "U"),
        ("Q", East, "R"),
        ("R", East, "S"),
        ("R", South, "W"),
        ("T", South, "Y"),
        ("V", East, "W"),
        ("W", East, "X"),
    ],
    target: "M",
    start: "A",
};

const CORRIDOR: MazeLayout = MazeLayout {
    nodes: &[("A", "E", (0, 0)), ("B", "EW", (1, 0)), ("C", "W", (2, 0))],
    arcs: &[("A", East, "B"), ("B", East, "C")],
    target: "C",
    start: "A",
};

/// 2x2 grid missing the B-D arc, so B is a dead end next to the target.
const DEAD_END_SQUARE: MazeLayout = MazeLayout {
    nodes: &[
        ("A", "NE", (0, 0)),
        ("B", "S", (0, 1)),
        ("C", "NW", (1, 0)),
        ("D", "S", (1, 1)),
    ],
    arcs: &[("A", North, "B"), ("A", East, "C"), ("C", North, "D")],
    target: "D",
    start: "A",
};

/// A 2x2 loop with a spur to the east leading to the target.
const LOOP: MazeLayout = MazeLayout {
    nodes: &[
        ("A", "NE", (0, 0)),
        ("B", "NEW", (1, 0)),
        ("C", "SW", (1, 1)),
        ("D", "ES", (0, 1)),
        ("T", "W", (2, 0)),
    ],
    arcs: &[
        ("A", North, "D"),
        ("D", East, "C"),
        ("C", South, "B"),
        ("B", West, "A"),
        ("B", East, "T"),
    ],
    target: "T",
    start: "A",
};

pub static MAZE_REGISTRY: Lazy<HashMap<MazeKind, MazeLayout>> = Lazy::new(|| {
    let mut map: HashMap<MazeKind, MazeLayout> = HashMap::new();
    map.insert(MazeKind::Labyrinth, LABYRINTH);
    map.insert(MazeKind::Corridor, CORRIDOR);
    map.insert(MazeKind::DeadEndSquare, DEAD_END_SQUARE);
    map.insert(MazeKind::Loop, LOOP);
    map
});
