use logging_utils::{LoggableActor, log_activity, log_fn_call, log_warning, warning_payload};

use super::frame::GraphFrame;
use super::master::MasterMap;
use crate::components::graph::NodeId;
use crate::utils::direction::{Direction, Exits, Signature};

/// What a merge added to the master map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    pub learned_nodes: usize,
    pub learned_arcs: usize,
}

impl MasterMap {
    /// Splices a finished run into the master map.
    ///
    /// The first run is adopted as is and its final node becomes the anchor.
    /// Later runs are replayed backwards from the anchor: the travel log
    /// reversed with every direction flipped, paired with the arrival
    /// signatures reversed, through the same arrival rules the run used.
    pub(crate) fn merge_run(
        &mut self,
        run: &GraphFrame,
        current: NodeId,
        coordinates: (i32, i32),
        directions: &[Direction],
        signatures: &[Signature],
    ) -> MergeOutcome {
        log_fn_call!(self, "merge_run()", coordinates; "moves" => directions.len(), "arrivals" => signatures.len());

        let Some(anchor) = self.anchor else {
            return self.adopt(run, current, coordinates);
        };

        let (nodes_before, arcs_before) = (self.graph().node_count(), self.graph().arc_count());
        let mut prev = anchor;
        let reversed_signatures: Vec<&Signature> = signatures.iter().rev().collect();

        for (k, dir) in directions.iter().rev().map(|dir| dir.opposite()).enumerate() {
            let Some(signature) = reversed_signatures.get(k + 1) else {
                let step = k;
                log_warning!(
                    self,
                    warning_payload!("travel log longer than arrival log", "replay truncated", "merge_run()", step)
                );
                break;
            };
            match self.frame.arrive(prev, dir, Exits::from_signature(signature)) {
                Some((node, _)) => prev = node,
                None => {
                    let step = k;
                    log_warning!(
                        self,
                        warning_payload!("replay lost its position", "replay truncated", "merge_run()", step)
                    );
                    break;
                }
            }
        }

        let outcome = MergeOutcome {
            learned_nodes: self.graph().node_count() - nodes_before,
            learned_arcs: self.graph().arc_count() - arcs_before,
        };
        log_activity!(self,
            "event" => "run merged",
            "learned nodes" => outcome.learned_nodes,
            "learned arcs" => outcome.learned_arcs,
            "master nodes" => self.graph().node_count(),
            "master arcs" => self.graph().arc_count(),
        );
        outcome
    }

    fn adopt(&mut self, run: &GraphFrame, current: NodeId, coordinates: (i32, i32)) -> MergeOutcome {
        self.frame = run.clone();
        if let Some(node) = self.frame.graph.node_mut(current) {
            node.is_target = true;
        }
        self.anchor = Some(current);
        self.anchor_coordinates = coordinates;

        let outcome = MergeOutcome {
            learned_nodes: self.graph().node_count(),
            learned_arcs: self.graph().arc_count(),
        };
        log_activity!(self,
            "event" => "master map created",
            "anchor" => self.frame.name_of(current),
            "nodes" => outcome.learned_nodes,
            "arcs" => outcome.learned_arcs,
        );
        outcome
    }
}
