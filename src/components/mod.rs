pub mod explorer;
pub mod game_loop;
pub mod graph;
pub mod map_builder;
pub mod oracle;
#[cfg(test)]
mod tests;

pub use game_loop::{Session, SessionState};
