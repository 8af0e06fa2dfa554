pub mod direction;
pub mod error;
pub mod registry;
pub mod types;

pub use direction::{Direction, Exits, Signature};
pub use error::ExplorerError;
pub use registry::{MAZE_REGISTRY, MazeKind, MazeLayout};
pub use types::{MapSnapshot, NodeSummary, RunReport};
