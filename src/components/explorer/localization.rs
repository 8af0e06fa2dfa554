use std::cmp::Ordering;

use crate::components::graph::{Graph, NodeId};
use crate::components::map_builder::MasterMap;
use crate::utils::direction::{Direction, Signature};

/// One entry of the path walked since the start of the run.
///
/// The path always starts and ends with a `Node`, alternating with the `Move`
/// that led from one to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Node(Signature),
    Move(Direction),
}

/// A master-map node the explorer might currently be standing on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hypothesis {
    pub node: NodeId,
    pub name: String,
    /// Number of path positions that agree with the master map, walking back from here.
    pub score: usize,
}

/// Ranks the master-map nodes that could be the current position.
///
/// Every non-target node with the current signature is checked by walking
/// `path` backwards over the master map. A signature mismatch discards the
/// candidate. If the master map has no explored arc to follow back, the
/// positions matched so far are the score. Survivors come out best first,
/// ties broken by name descending.
pub fn localize(master: &MasterMap, path: &[PathStep]) -> Vec<Hypothesis> {
    let Some(current) = path.iter().rev().find_map(|step| match step {
        PathStep::Node(signature) => Some(signature),
        PathStep::Move(_) => None,
    }) else {
        return Vec::new();
    };

    let graph = master.graph();
    let mut hypotheses: Vec<Hypothesis> = master
        .candidates(current)
        .into_iter()
        .filter_map(|node| {
            let score = consistency_score(graph, node, path);
            let name = graph.node(node)?.name().to_string();
            (score > 0).then_some(Hypothesis { node, name, score })
        })
        .collect();

    hypotheses.sort_by(|a, b| match b.score.cmp(&a.score) {
        Ordering::Equal => b.name.cmp(&a.name),
        other => other,
    });
    hypotheses
}

/// Walks `path` backwards from `candidate`, 0 on the first signature mismatch.
pub fn consistency_score(graph: &Graph, candidate: NodeId, path: &[PathStep]) -> usize {
    let mut at = candidate;
    let mut matched = 0;

    for step in path.iter().rev() {
        let Some(node) = graph.node(at) else {
            return 0;
        };
        match step {
            PathStep::Node(signature) => {
                if node.signature() != *signature {
                    return 0;
                }
                matched += 1;
            }
            PathStep::Move(dir) => {
                let back = dir.opposite();
                match node.neighbor(back).filter(|_| node.was_explored(back)) {
                    Some(prev) => at = prev,
                    None => return matched,
                }
            }
        }
    }
    matched
}
