pub mod localization;
mod pathfinding;
mod search;
pub mod state;
#[cfg(test)]
mod test;

use logging_utils::{ActorType, LoggableActor, log_activity, log_fn_call, log_internal_op};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::map_builder::{MapBuilder, MasterMap};
use crate::components::oracle::DirectionOracle;
use crate::utils::direction::Direction;
use crate::utils::error::ExplorerError;
use crate::utils::types::{MapSnapshot, RunReport};

pub use localization::{Hypothesis, PathStep};
pub use state::ExplorerState;

/// struct of the explorer
///
/// Drives runs over a [`DirectionOracle`], maps each run and merges it into
/// the master map it owns for the whole session.
pub struct Explorer<O: DirectionOracle, R: Rng = StdRng> {
    pub explorer_id: u32,
    pub(crate) oracle: O,
    pub(crate) rng: R,
    pub(crate) builder: MapBuilder,
    pub(crate) master: MasterMap,
    pub(crate) path: Vec<PathStep>,
    state: ExplorerState,
    runs_completed: usize,
    moves_this_run: Vec<Direction>,
}

impl<O: DirectionOracle> Explorer<O, StdRng> {
    /// Creates a new Explorer with an OS-seeded random generator
    pub fn new(explorer_id: u32, oracle: O) -> Self {
        Self::with_rng(explorer_id, oracle, StdRng::from_os_rng())
    }

    /// Creates a new Explorer whose random choices are reproducible
    pub fn seeded(explorer_id: u32, oracle: O, seed: u64) -> Self {
        Self::with_rng(explorer_id, oracle, StdRng::seed_from_u64(seed))
    }
}

impl<O: DirectionOracle, R: Rng> Explorer<O, R> {
    pub fn with_rng(explorer_id: u32, oracle: O, rng: R) -> Self {
        Self {
            explorer_id,
            oracle,
            rng,
            builder: MapBuilder::new(explorer_id),
            master: MasterMap::new(),
            path: Vec::new(),
            state: ExplorerState::Idle,
            runs_completed: 0,
            moves_this_run: Vec::new(),
        }
    }

    // ==================== Getter Methods ====================

    pub fn id(&self) -> u32 {
        self.explorer_id
    }

    pub fn state(&self) -> ExplorerState {
        self.state
    }

    pub fn master(&self) -> &MasterMap {
        &self.master
    }

    pub fn builder(&self) -> &MapBuilder {
        &self.builder
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn runs_completed(&self) -> usize {
        self.runs_completed
    }

    /// Node list, arc list and target of the master map.
    pub fn snapshot(&self) -> MapSnapshot {
        self.master.snapshot()
    }

    pub(crate) fn set_state(&mut self, state: ExplorerState) {
        if self.state != state {
            log_internal_op!(self, "state" => format!("{:?} -> {:?}", self.state, state));
            self.state = state;
        }
    }

    // ==================== Runs ====================

    /// Explores from wherever the oracle stands until the target is sensed,
    /// then merges the run and asks the oracle for a new start.
    ///
    /// Fails with [`ExplorerError::TargetUnreachable`] when every direction
    /// from the start was tried; the run is discarded and the master map
    /// is left untouched.
    pub fn run_once(&mut self) -> Result<RunReport, ExplorerError> {
        let start = self.oracle.position();
        let run_index = self.runs_completed + 1;
        log_activity!(self, "event" => "run started", "run" => run_index, "start" => start.clone().unwrap_or_default());

        self.path.clear();
        self.moves_this_run.clear();
        let exits = self.oracle.sense();
        self.builder.record_and_connect(exits);
        self.path.push(PathStep::Node(exits.signature()));

        if !self.search(None) {
            let explored = self.builder.graph().node_count();
            self.builder.discard_run();
            self.path.clear();
            self.set_state(ExplorerState::Exhausted);
            let err = ExplorerError::TargetUnreachable {
                start: start.unwrap_or_else(|| "origin".to_string()),
                explored,
            };
            log_activity!(self, "event" => "run failed", "error" => err);
            return Err(err);
        }

        let outcome = self.builder.start_new_run(&mut self.master);
        self.oracle.start_new_run();
        self.path.clear();
        self.runs_completed += 1;

        let report = RunReport {
            run_index,
            start,
            moves: std::mem::take(&mut self.moves_this_run),
            learned_nodes: outcome.learned_nodes,
            learned_arcs: outcome.learned_arcs,
            master_nodes: self.master.graph().node_count(),
            master_arcs: self.master.graph().arc_count(),
            anchor: self.master.target_summary(),
        };
        log_activity!(self, "event" => "target reached", "report" => report);
        Ok(report)
    }

    /// Repeats runs while `keep_going` approves the last report.
    ///
    /// Returns the number of runs completed in the session so far.
    pub fn traverse<F>(&mut self, mut keep_going: F) -> Result<usize, ExplorerError>
    where
        F: FnMut(&RunReport) -> bool,
    {
        log_fn_call!(self, "traverse()"; "runs completed" => self.runs_completed);
        loop {
            let report = self.run_once()?;
            if !keep_going(&report) {
                return Ok(self.runs_completed);
            }
        }
    }
}

impl<O: DirectionOracle, R: Rng> LoggableActor for Explorer<O, R> {
    fn actor_type(&self) -> ActorType {
        ActorType::Explorer
    }

    fn actor_id(&self) -> u32 {
        self.explorer_id
    }
}
