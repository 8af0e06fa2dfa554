use crossbeam_channel::unbounded;
use omc_maze::messages::{SessionToUi, UiToSession};
use omc_maze::run_with_ui;
use omc_maze::settings::{self, ExplorerSettings};
use std::io;
use std::io::Write;
use std::thread;

//This main let us terminate in an elegant and simple way, returning the error message
fn main() -> Result<(), String> {
    // Load env (MAZE_LAYOUT, MAZE_RNG_SEED, MAZE_MAX_RUNS, MAZE_START_NODE)
    let loaded = ExplorerSettings::from_env();
    settings::set_settings(loaded);
    let session_settings = settings::get_settings();
    println!("{:?}", session_settings);

    let (sender_session_ui, receiver_session_ui) = unbounded();
    let (sender_ui_session, receiver_ui_session) = unbounded();

    let handle = thread::spawn(move || run_with_ui(session_settings, sender_session_ui, receiver_ui_session));

    // Print whatever the session reports
    let printer = thread::spawn(move || {
        for event in receiver_session_ui.iter() {
            match event {
                SessionToUi::RunCompleted(report) => println!("{report}"),
                SessionToUi::Snapshot(snapshot) => {
                    println!("{} nodes, {} arcs", snapshot.nodes.len(), snapshot.arcs.len());
                    for node in &snapshot.nodes {
                        println!("  {node}");
                    }
                    for (a, b) in &snapshot.arcs {
                        println!("  {a} <--> {b}");
                    }
                }
                SessionToUi::TargetUnreachable(err) => println!("Error: {err}"),
                SessionToUi::Ended { runs } => {
                    println!("Session ended after {runs} runs");
                    break;
                }
            }
        }
    });

    loop {
        if handle.is_finished() {
            break;
        }
        println!("Enter command (start, pause, snapshot, end):");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let mut command = String::new();
        io::stdin().read_line(&mut command).map_err(|e| e.to_string())?;
        let msg = match command.as_str().trim() {
            "start" => UiToSession::StartExploration,
            "pause" => UiToSession::PauseExploration,
            "snapshot" => UiToSession::RequestSnapshot,
            "end" => UiToSession::EndExploration,
            _ => {
                println!("Invalid input");
                continue;
            }
        };
        if sender_ui_session.send(msg).is_err() || msg == UiToSession::EndExploration {
            break;
        }
    }

    let result = handle.join().map_err(|_| "The session thread panicked".to_string())?;
    let _ = printer.join();
    match result {
        Ok(runs) => {
            println!("{runs} runs completed");
            Ok(())
        }
        Err(err) => Err(err.to_string()),
    }
}
