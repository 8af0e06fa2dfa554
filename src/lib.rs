mod components;
pub mod messages;
pub mod settings;
mod utils;

pub use components::explorer::localization::{consistency_score, localize};
pub use components::explorer::{Explorer, ExplorerState, Hypothesis, PathStep};
pub use components::game_loop::{build_explorer, run_with_ui};
pub use components::graph::{Arc, Graph, Node, NodeId};
pub use components::map_builder::{ArrivalKind, MapBuilder, MasterMap, MergeOutcome};
pub use components::oracle::{DirectionOracle, GraphWalker};
pub use components::{Session, SessionState};
pub use utils::{
    Direction, ExplorerError, Exits, MAZE_REGISTRY, MapSnapshot, MazeKind, MazeLayout, NodeSummary,
    RunReport, Signature,
};
