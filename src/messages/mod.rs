pub mod ui_messages;

pub use ui_messages::{SessionToUi, UiToSession};
