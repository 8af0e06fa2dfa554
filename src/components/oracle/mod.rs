pub mod graph_walker;

use crate::utils::direction::{Direction, Exits};

pub use graph_walker::GraphWalker;

/// What the explorer can ask of whatever actually moves it around.
///
/// `go` is only ever called for a direction `can_go` just confirmed.
pub trait DirectionOracle {
    fn can_go(&self, dir: Direction) -> bool;

    /// Moves one cell in `dir`.
    fn go(&mut self, dir: Direction);

    fn target_reached(&self) -> bool;

    /// Repositions to a new, arbitrary starting cell for the next run.
    fn start_new_run(&mut self);

    /// Exit flags of the current cell.
    fn sense(&self) -> Exits {
        Exits::from_fn(|dir| self.can_go(dir))
    }

    /// Name of the current cell, for oracles that know it.
    fn position(&self) -> Option<String> {
        None
    }
}
