use crossbeam_channel::{Receiver, Sender, select, select_biased, tick};
use log::info;
use logging_utils::{
    ActorType, LoggableActor, debug_println, log_activity, log_fn_call, log_internal_op, log_warning,
    warning_payload,
};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use crate::components::explorer::Explorer;
use crate::components::oracle::{DirectionOracle, GraphWalker};
use crate::messages::{SessionToUi, UiToSession};
use crate::settings::ExplorerSettings;
use crate::utils::error::ExplorerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    WaitingStart,
    Running,
    Paused,
}

impl SessionState {
    pub fn can_start(&self) -> bool {
        matches!(self, SessionState::WaitingStart | SessionState::Paused)
    }

    pub fn can_pause(&self) -> bool {
        matches!(self, SessionState::Running)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, SessionState::Running)
    }
}

struct SessionTick {
    ticker: Receiver<std::time::Instant>,
    start_time: std::time::Instant,
}
impl SessionTick {
    pub fn new(tick_duration: Duration) -> Self {
        Self {
            ticker: tick(tick_duration),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Manages the exploration loop, pacing, and state transitions.
///
/// The session owns the explorer, and with it the master map, for its
/// whole lifetime: one run is explored per tick while running.
pub struct Session<O: DirectionOracle = GraphWalker, R: Rng = StdRng> {
    state: SessionState,
    explorer: Explorer<O, R>,
    max_runs: Option<usize>,
    run_interval: Duration,
    clock: SessionTick,
    // UI communication
    receiver_session_ui: Receiver<UiToSession>,
    sender_session_ui: Sender<SessionToUi>,
}

impl<O: DirectionOracle, R: Rng> Session<O, R> {
    pub fn new(
        explorer: Explorer<O, R>,
        max_runs: Option<usize>,
        run_interval: Duration,
        receiver_session_ui: Receiver<UiToSession>,
        sender_session_ui: Sender<SessionToUi>,
    ) -> Self {
        //env_logger initialization
        let _ = env_logger::try_init();
        Self {
            state: SessionState::WaitingStart,
            explorer,
            max_runs,
            run_interval,
            clock: SessionTick::new(run_interval),
            receiver_session_ui,
            sender_session_ui,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Main session loop, returns the number of completed runs once it ends.
    pub fn run(mut self) -> Result<usize, ExplorerError> {
        /*Priority of the messages:
            1. UI messages: they control the session so they come first
            2. Exploration: one run per tick while running
        */
        loop {
            select_biased! {
                // Priority 1: UI commands
                recv(self.receiver_session_ui) -> msg => {
                    let msg = msg.map_err(|_| ExplorerError::ChannelClosed("ui commands".to_string()))?;
                    if let Some(runs) = self.handle_ui_command(msg)? {
                        return Ok(runs);
                    }
                }

                // Priority 2: explore
                default => {
                    if self.state.is_running() {
                        if let Some(runs) = self.session_tick()? {
                            return Ok(runs);
                        }
                    }
                    // Avoid busy-waiting
                    std::thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }

    /// Returns the final run count when the command ends the session.
    fn handle_ui_command(&mut self, msg: UiToSession) -> Result<Option<usize>, ExplorerError> {
        log_fn_call!(self, "handle_ui_command()", msg);
        match (self.state, msg) {
            (_, UiToSession::EndExploration) => {
                debug_println!("The exploration should end now");
                let runs = self.explorer.runs_completed();
                info!("exploration ended by the UI after {runs} runs");
                self.notify_ui(SessionToUi::Ended { runs })?;
                return Ok(Some(runs));
            }
            (state, UiToSession::StartExploration) if state.can_start() => {
                debug_println!("The exploration should start or restart");
                self.clock = SessionTick::new(self.run_interval);
                self.state = SessionState::Running;
                log_activity!(self, "event" => "session running");
            }
            (state, UiToSession::PauseExploration) if state.can_pause() => {
                debug_println!("The exploration should pause");
                self.state = SessionState::Paused;
                log_activity!(self, "event" => "session paused");
            }
            (_, UiToSession::RequestSnapshot) => {
                self.notify_ui(SessionToUi::Snapshot(self.explorer.snapshot()))?;
            }
            (state, msg) => {
                let command = format!("{:?}", msg);
                let session = format!("{:?}", state);
                log_warning!(
                    self,
                    warning_payload!("invalid command in this state", "ignored", "handle_ui_command()", command, session)
                );
            }
        }

        Ok(None)
    }

    fn session_tick(&mut self) -> Result<Option<usize>, ExplorerError> {
        select! {
            recv(self.clock.ticker) -> _ => {
                debug_println!("{:?}", self.clock.start_time.elapsed());
                self.explore_once()
            }
            default => {
                // No tick yet
                Ok(None)
            }
        }
    }

    /// Explores one run and reports it. Returns the run count when the run
    /// limit is reached; an unreachable target ends the session with an error.
    fn explore_once(&mut self) -> Result<Option<usize>, ExplorerError> {
        match self.explorer.run_once() {
            Ok(report) => {
                self.notify_ui(SessionToUi::RunCompleted(report))?;
                let runs = self.explorer.runs_completed();
                if self.max_runs.is_some_and(|max| runs >= max) {
                    info!("run limit reached after {runs} runs");
                    self.notify_ui(SessionToUi::Ended { runs })?;
                    return Ok(Some(runs));
                }
                Ok(None)
            }
            Err(err) => {
                self.notify_ui(SessionToUi::TargetUnreachable(err.clone()))?;
                self.notify_ui(SessionToUi::Ended {
                    runs: self.explorer.runs_completed(),
                })?;
                Err(err)
            }
        }
    }

    fn notify_ui(&self, msg: SessionToUi) -> Result<(), ExplorerError> {
        log_internal_op!(self, "notify" => format!("{:?}", msg));
        self.sender_session_ui
            .send(msg)
            .map_err(|_| ExplorerError::ChannelClosed("session events".to_string()))
    }
}

impl<O: DirectionOracle, R: Rng> LoggableActor for Session<O, R> {
    fn actor_type(&self) -> ActorType {
        ActorType::Session
    }

    fn actor_id(&self) -> u32 {
        self.explorer.explorer_id
    }
}

/// Builds the walker and the explorer described by `settings`.
pub fn build_explorer(settings: &ExplorerSettings) -> Result<Explorer<GraphWalker, StdRng>, ExplorerError> {
    let layout = settings.layout.layout()?;
    let maze = layout.build()?;
    let start = settings.start_node.as_deref().unwrap_or(layout.start);
    let (walker, explorer_rng) = match settings.rng_seed {
        Some(seed) => (
            GraphWalker::with_rng(maze, start, StdRng::seed_from_u64(seed))?,
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ),
        None => (GraphWalker::new(maze, start)?, StdRng::from_os_rng()),
    };
    Ok(Explorer::with_rng(1, walker, explorer_rng))
}

/// Entry point for running an exploration session driven over channels
pub fn run_with_ui(
    settings: ExplorerSettings,
    sender_session_ui: Sender<SessionToUi>,
    receiver_session_ui: Receiver<UiToSession>,
) -> Result<usize, ExplorerError> {
    let explorer = build_explorer(&settings)?;

    // Create and run the session loop
    let session = Session::new(
        explorer,
        settings.max_runs,
        Duration::from_millis(100),
        receiver_session_ui,
        sender_session_ui,
    );

    session.run()
}
