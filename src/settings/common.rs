use std::str::FromStr;
use std::sync::{LazyLock, RwLock};

use logging_utils::{ActorType, log_warning, warning_payload};

use crate::utils::registry::MazeKind;

pub const ENV_RNG_SEED: &str = "MAZE_RNG_SEED";
pub const ENV_MAX_RUNS: &str = "MAZE_MAX_RUNS";
pub const ENV_LAYOUT: &str = "MAZE_LAYOUT";
pub const ENV_START_NODE: &str = "MAZE_START_NODE";

/// Knobs of an exploration session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExplorerSettings {
    /// Seed for the explorer and walker generators, random when unset.
    pub rng_seed: Option<u64>,
    /// Stop after this many completed runs, never when unset.
    pub max_runs: Option<usize>,
    pub layout: MazeKind,
    /// Start node of the first run, the layout's default when unset.
    pub start_node: Option<String>,
}

impl ExplorerSettings {
    /// Reads `.env` and then the process environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the settings from any key lookup. Malformed values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(seed) = parse_value(&lookup, ENV_RNG_SEED) {
            settings.rng_seed = Some(seed);
        }
        if let Some(runs) = parse_value(&lookup, ENV_MAX_RUNS) {
            settings.max_runs = Some(runs);
        }
        if let Some(layout) = parse_value(&lookup, ENV_LAYOUT) {
            settings.layout = layout;
        }
        settings.start_node = lookup(ENV_START_NODE)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        settings
    }
}

fn parse_value<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log_warning!(
                dir ActorType::Session,
                0,
                warning_payload!("malformed setting", "default kept", "from_lookup()", key, raw)
            );
            None
        }
    }
}

// Initialised with the defaults on first use
static EXPLORER_SETTINGS: LazyLock<RwLock<ExplorerSettings>> =
    LazyLock::new(|| RwLock::new(ExplorerSettings::default()));

pub fn get_settings() -> ExplorerSettings {
    match EXPLORER_SETTINGS.read() {
        Ok(settings) => settings.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn set_settings(new_settings: ExplorerSettings) {
    match EXPLORER_SETTINGS.write() {
        Ok(mut settings) => *settings = new_settings,
        Err(poisoned) => *poisoned.into_inner() = new_settings,
    }
}
