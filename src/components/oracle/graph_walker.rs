use std::collections::VecDeque;

use logging_utils::{ActorType, LoggableActor, log_internal_op, log_warning, warning_payload};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::DirectionOracle;
use crate::components::graph::{Graph, NodeId};
use crate::utils::direction::Direction;
use crate::utils::error::ExplorerError;

/// Walks an in-memory maze.
///
/// New runs start at the next queued start node, or at a random non-target
/// node once the queue is empty.
pub struct GraphWalker<R: Rng = StdRng> {
    walker_id: u32,
    maze: Graph,
    position: NodeId,
    starts: VecDeque<NodeId>,
    moves: Vec<Direction>,
    rng: R,
}

impl GraphWalker<StdRng> {
    pub fn new(maze: Graph, start: &str) -> Result<Self, ExplorerError> {
        Self::with_rng(maze, start, StdRng::from_os_rng())
    }
}

impl<R: Rng> GraphWalker<R> {
    pub fn with_rng(maze: Graph, start: &str, rng: R) -> Result<Self, ExplorerError> {
        let position = maze
            .get_node(start)
            .ok_or_else(|| ExplorerError::UnknownNode(start.to_string()))?;
        Ok(Self {
            walker_id: 1,
            maze,
            position,
            starts: VecDeque::new(),
            moves: Vec::new(),
            rng,
        })
    }

    /// Queues the start node of a future run.
    pub fn queue_start(&mut self, name: &str) -> Result<(), ExplorerError> {
        let id = self
            .maze
            .get_node(name)
            .ok_or_else(|| ExplorerError::UnknownNode(name.to_string()))?;
        self.starts.push_back(id);
        Ok(())
    }

    /// Moves without counting as a run move, used to pick where the first run begins.
    pub fn place_at(&mut self, name: &str) -> Result<(), ExplorerError> {
        self.position = self
            .maze
            .get_node(name)
            .ok_or_else(|| ExplorerError::UnknownNode(name.to_string()))?;
        Ok(())
    }

    pub fn maze(&self) -> &Graph {
        &self.maze
    }

    pub fn position_name(&self) -> &str {
        self.maze.node(self.position).map(|n| n.name()).unwrap_or_default()
    }

    /// Physical moves since the current run started.
    pub fn moves(&self) -> &[Direction] {
        &self.moves
    }

    fn random_start(&mut self) -> Option<NodeId> {
        let pool: Vec<NodeId> = self
            .maze
            .nodes()
            .filter(|(_, node)| !node.is_target)
            .map(|(id, _)| id)
            .collect();
        pool.choose(&mut self.rng).copied()
    }
}

impl<R: Rng> DirectionOracle for GraphWalker<R> {
    fn can_go(&self, dir: Direction) -> bool {
        self.maze.neighbor(self.position, dir).is_some()
    }

    fn go(&mut self, dir: Direction) {
        match self.maze.neighbor(self.position, dir) {
            Some(next) => {
                self.position = next;
                self.moves.push(dir);
            }
            None => {
                debug_assert!(false, "go({dir}) called without an exit");
                let at = self.position_name().to_string();
                log_warning!(
                    self,
                    warning_payload!("no exit in this direction", "did not move", "go()", at; "direction" => dir)
                );
            }
        }
    }

    fn target_reached(&self) -> bool {
        self.maze.node(self.position).is_some_and(|node| node.is_target)
    }

    fn start_new_run(&mut self) {
        let next = match self.starts.pop_front() {
            Some(id) => Some(id),
            None => self.random_start(),
        };
        if let Some(id) = next {
            self.position = id;
        }
        self.moves.clear();
        log_internal_op!(self, "action" => "new run", "start" => self.position_name());
    }

    fn position(&self) -> Option<String> {
        Some(self.position_name().to_string())
    }
}

impl<R: Rng> LoggableActor for GraphWalker<R> {
    fn actor_type(&self) -> ActorType {
        ActorType::Oracle
    }

    fn actor_id(&self) -> u32 {
        self.walker_id
    }
}
