use crate::utils::error::ExplorerError;
use crate::utils::types::{MapSnapshot, RunReport};

/// Events the exploration session sends to whoever drives it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionToUi {
    RunCompleted(RunReport),
    Snapshot(MapSnapshot),
    TargetUnreachable(ExplorerError),
    /// The session loop is over, with the number of runs completed.
    Ended { runs: usize },
}

/// Commands accepted by the exploration session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiToSession {
    StartExploration,
    PauseExploration,
    RequestSnapshot,
    EndExploration,
}
