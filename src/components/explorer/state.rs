use crate::utils::direction::Direction;

/// these are the states of the explorer state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerState {
    Idle,
    AtNode,
    Choosing,
    Moving(Direction),
    Backtracking(Direction),
    TargetFound,
    Exhausted,
}

impl ExplorerState {
    /// tells if the current run is over, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExplorerState::TargetFound | ExplorerState::Exhausted)
    }

    /// tells if the explorer is physically on its way somewhere
    pub fn is_moving(&self) -> bool {
        matches!(self, ExplorerState::Moving(_) | ExplorerState::Backtracking(_))
    }
}
