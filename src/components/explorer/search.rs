use std::collections::VecDeque;

use logging_utils::{
    ActorType, EventType, LoggableActor, log_fn_call, log_internal_op, log_message,
};
use rand::Rng;

use super::localization::{PathStep, localize};
use super::state::ExplorerState;
use super::Explorer;
use crate::components::oracle::DirectionOracle;
use crate::utils::direction::Direction;

/// Directions still to try at a node: preferred ones first, in the order
/// they were suggested, then the rest in random order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectionChoices {
    preferred: VecDeque<Direction>,
    remaining: Vec<Direction>,
}

impl DirectionChoices {
    pub(crate) fn new(available: Vec<Direction>) -> Self {
        Self {
            preferred: VecDeque::new(),
            remaining: available,
        }
    }

    /// Moves `dir` to the preferred queue if it is still available and not preferred yet.
    pub(crate) fn prefer(&mut self, dir: Direction) {
        if let Some(pos) = self.remaining.iter().position(|d| *d == dir) {
            self.remaining.remove(pos);
            self.preferred.push_back(dir);
        }
    }

    pub(crate) fn preferred(&self) -> Vec<Direction> {
        self.preferred.iter().copied().collect()
    }

    pub(crate) fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Direction> {
        if let Some(dir) = self.preferred.pop_front() {
            return Some(dir);
        }
        match self.remaining.len() {
            0 => None,
            1 => self.remaining.pop(),
            n => Some(self.remaining.remove(rng.random_range(0..n))),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.preferred.is_empty() && self.remaining.is_empty()
    }
}

impl<O: DirectionOracle, R: Rng> Explorer<O, R> {
    /// Depth-first search from the node just recorded.
    ///
    /// Returns true as soon as the target is sensed. When every direction
    /// fails, walks back through `arrived_by` and returns false.
    pub(super) fn search(&mut self, arrived_by: Option<Direction>) -> bool {
        self.set_state(ExplorerState::AtNode);
        if self.oracle.target_reached() {
            self.set_state(ExplorerState::TargetFound);
            return true;
        }

        self.set_state(ExplorerState::Choosing);
        let mut choices = self.rank_directions(arrived_by);
        while let Some(dir) = choices.next(&mut self.rng) {
            self.set_state(ExplorerState::Moving(dir));
            self.travel(dir);
            if self.search(Some(dir)) {
                return true;
            }
        }

        if let Some(back) = arrived_by.map(Direction::opposite) {
            self.set_state(ExplorerState::Backtracking(back));
            self.travel(back);
        }
        false
    }

    /// Directions worth trying from the current node, hypotheses applied.
    pub(crate) fn rank_directions(&mut self, arrived_by: Option<Direction>) -> DirectionChoices {
        let available = self.available_directions(arrived_by);
        let mut choices = DirectionChoices::new(available);

        for hypothesis in localize(&self.master, &self.path) {
            if let Some(dir) = self.master.shortest_direction(hypothesis.node) {
                log_internal_op!(self,
                    "hypothesis" => hypothesis.name,
                    "score" => hypothesis.score,
                    "suggests" => dir,
                );
                choices.prefer(dir);
            }
        }

        let preferred = format!("{:?}", choices.preferred());
        log_fn_call!(self, "rank_directions()", arrived_by; result = preferred);
        choices
    }

    /// Exits of the current node, minus the way back and the cells already
    /// visited in this run (closing loops on the way).
    pub(crate) fn available_directions(&mut self, arrived_by: Option<Direction>) -> Vec<Direction> {
        let excluded = self.builder.close_loops();
        let Some(node) = self
            .builder
            .current_node()
            .and_then(|id| self.builder.graph().node(id))
        else {
            return Vec::new();
        };
        let back = arrived_by.map(Direction::opposite);
        node.exits()
            .directions()
            .into_iter()
            .filter(|dir| Some(*dir) != back && !excluded.contains(dir))
            .collect()
    }

    /// Physically moves one cell and records the arrival.
    pub(super) fn travel(&mut self, dir: Direction) {
        let explorer_id = self.explorer_id;
        log_message!(
            ActorType::Explorer,
            explorer_id,
            ActorType::Oracle,
            1u32,
            EventType::MessageExplorerToOracle,
            "go";
            "direction" => dir
        );
        self.oracle.go(dir);
        self.moves_this_run.push(dir);
        self.builder.go(dir);

        let exits = self.oracle.sense();
        self.builder.record_and_connect(exits);
        self.path.push(PathStep::Move(dir));
        self.path.push(PathStep::Node(exits.signature()));
    }
}
