use thiserror::Error;

/// Errors surfaced to whoever drives the exploration.
///
/// Node and arc integrity violations are not errors: they are logged
/// and ignored by the graph itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    /// Every direction reachable from the start of the run was tried without sensing the target.
    #[error("target unreachable from start node {start} ({explored} nodes explored)")]
    TargetUnreachable { start: String, explored: usize },

    #[error("invalid maze layout: {0}")]
    InvalidLayout(String),

    #[error("unknown maze layout: {0}")]
    UnknownLayout(String),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

impl ExplorerError {
    /// Whether the session can keep going after this error.
    pub fn is_retriable(&self) -> bool {
        !matches!(
            self,
            ExplorerError::TargetUnreachable { .. } | ExplorerError::ChannelClosed(_)
        )
    }
}
