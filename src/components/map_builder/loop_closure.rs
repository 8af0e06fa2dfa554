use logging_utils::{LoggableActor, log_fn_call, log_internal_op};
use strum::IntoEnumIterator;

use super::MapBuilder;
use crate::utils::direction::Direction;

impl MapBuilder {
    /// Closes loops around the current node without moving.
    ///
    /// For every exit leading to a cell already visited in this run, the
    /// two nodes are joined directly when both slots are still open, and a
    /// there-and-back pair is appended to the travel log so the merge
    /// replay stays consistent. Returns the directions that must not be
    /// walked physically, whether or not an arc was added.
    pub fn close_loops(&mut self) -> Vec<Direction> {
        let mut excluded = Vec::new();
        let Some(current) = self.current else {
            return excluded;
        };

        for dir in Direction::iter() {
            let Some(node) = self.frame.graph.node(current) else {
                break;
            };
            if !node.has_exit(dir) {
                continue;
            }
            let Some(neighbor) = self.frame.node_at(dir.step_from((self.x, self.y))) else {
                continue;
            };
            excluded.push(dir);

            let current_open = node.is_open(dir);
            let current_signature = node.signature();
            let Some(other) = self.frame.graph.node(neighbor) else {
                continue;
            };
            if !current_open || !other.is_open(dir.opposite()) {
                continue;
            }
            let neighbor_signature = other.signature();

            if self.frame.graph.add_arc(current, dir, neighbor) {
                if let Some(node) = self.frame.graph.node_mut(current) {
                    node.mark_explored(dir);
                }
                if let Some(other) = self.frame.graph.node_mut(neighbor) {
                    other.mark_explored(dir.opposite());
                }
                self.directions.push(dir);
                self.directions.push(dir.opposite());
                self.signatures.push(neighbor_signature);
                self.signatures.push(current_signature);
                log_internal_op!(self,
                    "action" => "loop closed",
                    "from" => self.frame.name_of(current),
                    "to" => self.frame.name_of(neighbor),
                    "direction" => dir,
                );
            }
        }

        log_fn_call!(self, "close_loops()"; result = format!("{:?}", excluded));
        excluded
    }
}
