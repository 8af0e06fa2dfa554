//! Turns per-step sensor readings into the current-run map and merges
//! completed runs into the master map.

pub mod frame;
mod loop_closure;
pub mod master;
mod merge;

use logging_utils::{ActorType, LoggableActor, log_fn_call, log_internal_op, log_warning, warning_payload};

use crate::components::graph::{Graph, NodeId};
use crate::utils::direction::{Direction, Exits, Signature};

pub use frame::{ArrivalKind, GraphFrame};
pub use master::MasterMap;
pub use merge::MergeOutcome;

/// Builds the map of the run in progress.
///
/// Every run starts from an empty frame with its first node at (0,0).
/// Alongside the graph it keeps the travel log (directions) and the
/// signature sensed at each arrival, which is what the merge replays.
#[derive(Debug, Clone)]
pub struct MapBuilder {
    owner_id: u32,
    frame: GraphFrame,
    current: Option<NodeId>,
    last_direction: Option<Direction>,
    x: i32,
    y: i32,
    arrival_pending: bool,
    directions: Vec<Direction>,
    signatures: Vec<Signature>,
}

impl MapBuilder {
    pub fn new(owner_id: u32) -> Self {
        Self {
            owner_id,
            frame: GraphFrame::new(),
            current: None,
            last_direction: None,
            x: 0,
            y: 0,
            arrival_pending: false,
            directions: Vec::new(),
            signatures: Vec::new(),
        }
    }

    /// Records the arrival at a location with the sensed `exits`.
    ///
    /// Calling it again without moving in between changes nothing and
    /// returns [`ArrivalKind::Repeat`].
    pub fn record_and_connect(&mut self, exits: Exits) -> ArrivalKind {
        let signature = exits.signature();
        log_fn_call!(self, "record_and_connect()"; "signature" => signature, "x" => self.x, "y" => self.y);

        let Some(prev) = self.current else {
            let Some(origin) = self.frame.spawn(exits, (0, 0)) else {
                return ArrivalKind::Repeat;
            };
            self.current = Some(origin);
            self.x = 0;
            self.y = 0;
            self.signatures.push(signature);
            self.arrival_pending = false;
            log_internal_op!(self, "arrival" => "origin", "node" => self.frame.name_of(origin));
            return ArrivalKind::Origin;
        };

        if !self.arrival_pending {
            return ArrivalKind::Repeat;
        }
        let Some(dir) = self.last_direction else {
            return ArrivalKind::Repeat;
        };

        match self.frame.arrive(prev, dir, exits) {
            Some((node, kind)) => {
                self.current = Some(node);
                self.signatures.push(signature);
                self.arrival_pending = false;
                kind
            }
            None => {
                let x = self.x;
                let y = self.y;
                log_warning!(
                    self,
                    warning_payload!("previous node missing from the run map", "arrival ignored", "record_and_connect()", x, y)
                );
                ArrivalKind::Repeat
            }
        }
    }

    /// Books a move in `dir`: coordinates, travel log and pending arrival.
    pub fn go(&mut self, dir: Direction) {
        let (x, y) = dir.step_from((self.x, self.y));
        self.x = x;
        self.y = y;
        self.last_direction = Some(dir);
        self.directions.push(dir);
        self.arrival_pending = true;
        log_internal_op!(self, "action" => "go", "direction" => dir, "x" => x, "y" => y);
    }

    pub fn go_north(&mut self) {
        self.go(Direction::North);
    }

    pub fn go_east(&mut self) {
        self.go(Direction::East);
    }

    pub fn go_south(&mut self) {
        self.go(Direction::South);
    }

    pub fn go_west(&mut self) {
        self.go(Direction::West);
    }

    /// Node the agent stands on, `None` before the first recording of a run.
    pub fn current_node(&self) -> Option<NodeId> {
        self.current
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    pub fn coordinates(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn graph(&self) -> &Graph {
        self.frame.graph()
    }

    pub fn frame(&self) -> &GraphFrame {
        &self.frame
    }

    /// Travel log of the run, synthetic loop-closure moves included.
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Signature sensed at every arrival, the origin included.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Merges the finished run into `master` and resets for the next run.
    pub fn start_new_run(&mut self, master: &mut MasterMap) -> MergeOutcome {
        log_fn_call!(self, "start_new_run()"; "nodes" => self.graph().node_count(), "arcs" => self.graph().arc_count());
        let outcome = match self.current {
            Some(current) => master.merge_run(
                &self.frame,
                current,
                (self.x, self.y),
                &self.directions,
                &self.signatures,
            ),
            None => {
                log_warning!(
                    self,
                    warning_payload!("nothing recorded in this run", "nothing merged", "start_new_run()")
                );
                MergeOutcome::default()
            }
        };
        self.reset();
        outcome
    }

    /// Throws the current run away without touching the master map.
    pub fn discard_run(&mut self) {
        log_internal_op!(self, "run discarded");
        self.reset();
    }

    fn reset(&mut self) {
        self.frame = GraphFrame::new();
        self.current = None;
        self.last_direction = None;
        self.x = 0;
        self.y = 0;
        self.arrival_pending = false;
        self.directions.clear();
        self.signatures.clear();
    }
}

impl LoggableActor for MapBuilder {
    fn actor_type(&self) -> ActorType {
        ActorType::MapBuilder
    }

    fn actor_id(&self) -> u32 {
        self.owner_id
    }
}
