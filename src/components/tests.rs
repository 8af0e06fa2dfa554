use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::components::explorer::Explorer;
use crate::components::game_loop::{Session, build_explorer};
use crate::components::graph::{Graph, Node};
use crate::components::oracle::GraphWalker;
use crate::messages::{SessionToUi, UiToSession};
use crate::settings::ExplorerSettings;
use crate::utils::direction::{Direction, Exits};
use crate::utils::error::ExplorerError;
use crate::utils::registry::{MAZE_REGISTRY, MazeKind, MazeLayout};

// ==================== Helper Functions ====================

type SessionHandle = thread::JoinHandle<Result<usize, ExplorerError>>;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn seeded_explorer(maze: Graph, start: &str, seed: u64) -> Explorer<GraphWalker, StdRng> {
    let walker = GraphWalker::with_rng(maze, start, StdRng::seed_from_u64(seed)).unwrap();
    Explorer::with_rng(1, walker, StdRng::seed_from_u64(seed + 1))
}

/// Spawns a session on its own thread and hands back both ends of the UI link.
fn spawn_session(
    explorer: Explorer<GraphWalker, StdRng>,
    max_runs: Option<usize>,
    interval: Duration,
) -> (Sender<UiToSession>, Receiver<SessionToUi>, SessionHandle) {
    init_logger();
    let (sender_ui_session, receiver_ui_session) = unbounded();
    let (sender_session_ui, receiver_session_ui) = unbounded();
    let session = Session::new(explorer, max_runs, interval, receiver_ui_session, sender_session_ui);
    let handle = thread::spawn(move || session.run());
    (sender_ui_session, receiver_session_ui, handle)
}

/// Collects every event up to and including `Ended`.
fn drain_until_ended(receiver: &Receiver<SessionToUi>) -> Vec<SessionToUi> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.recv_timeout(Duration::from_secs(10)) {
        let ended = matches!(event, SessionToUi::Ended { .. });
        events.push(event);
        if ended {
            break;
        }
    }
    events
}

/// A - B with the target sitting alone on the side.
fn unreachable_maze() -> Graph {
    let mut maze = Graph::new();
    let a = maze.add_node(Node::new("A", Exits::from_letters("E"))).unwrap();
    let b = maze.add_node(Node::new("B", Exits::from_letters("W"))).unwrap();
    let mut target = Node::new("T", Exits::default());
    target.is_target = true;
    maze.add_node(target).unwrap();
    assert!(maze.add_arc(a, Direction::East, b));
    maze
}

// ==================== Registry ====================

#[test]
fn every_registered_layout_builds() {
    for kind in [MazeKind::Labyrinth, MazeKind::Corridor, MazeKind::DeadEndSquare, MazeKind::Loop] {
        let layout = kind.layout().unwrap();
        let maze = layout.build().unwrap();
        assert_eq!(maze.node_count(), layout.nodes.len(), "{kind}");
        assert_eq!(maze.arc_count(), layout.arcs.len(), "{kind}");
        assert_eq!(maze.node(maze.target().unwrap()).unwrap().name(), layout.target);
        assert!(maze.contains_node(layout.start));
    }
    assert_eq!(MAZE_REGISTRY.len(), 4);
}

#[test]
fn labyrinth_shape() {
    let maze = MazeKind::Labyrinth.layout().unwrap().build().unwrap();
    assert_eq!(maze.node_count(), 25);
    assert_eq!(maze.arc_count(), 25);
    let target = maze.node(maze.target().unwrap()).unwrap();
    assert_eq!(target.name(), "M");
    // every open exit is wired in the demonstration mazes
    for (_, node) in maze.nodes() {
        for dir in node.exits().directions() {
            assert!(node.neighbor(dir).is_some(), "{} {dir}", node.name());
        }
    }
}

#[test]
fn maze_kind_parses_kebab_case() {
    assert_eq!("dead-end-square".parse::<MazeKind>().unwrap(), MazeKind::DeadEndSquare);
    assert_eq!("LOOP".parse::<MazeKind>().unwrap(), MazeKind::Loop);
    assert_eq!(MazeKind::DeadEndSquare.to_string(), "dead-end-square");
    assert!("spiral".parse::<MazeKind>().is_err());
    assert_eq!(MazeKind::default(), MazeKind::Labyrinth);
}

#[test]
fn random_kind_is_registered() {
    for _ in 0..10 {
        assert!(MazeKind::random().layout().is_ok());
    }
}

#[test]
fn layout_with_arc_against_exits_is_rejected() {
    let broken = MazeLayout {
        nodes: &[("A", "E", (0, 0)), ("B", "W", (1, 0))],
        arcs: &[("A", Direction::North, "B")],
        target: "B",
        start: "A",
    };
    assert!(matches!(broken.build(), Err(ExplorerError::InvalidLayout(_))));

    let no_target = MazeLayout {
        nodes: &[("A", "E", (0, 0)), ("B", "W", (1, 0))],
        arcs: &[("A", Direction::East, "B")],
        target: "Z",
        start: "A",
    };
    assert!(matches!(no_target.build(), Err(ExplorerError::InvalidLayout(_))));
}

// ==================== Explorer construction ====================

#[test]
fn build_explorer_honours_the_start_node() {
    let settings = ExplorerSettings {
        rng_seed: Some(7),
        layout: MazeKind::Corridor,
        start_node: Some("B".to_string()),
        ..Default::default()
    };
    let explorer = build_explorer(&settings).unwrap();
    assert_eq!(explorer.oracle().position_name(), "B");
    assert_eq!(explorer.runs_completed(), 0);
}

#[test]
fn build_explorer_without_seed_uses_the_layout_start() {
    let settings = ExplorerSettings {
        layout: MazeKind::DeadEndSquare,
        ..Default::default()
    };
    let explorer = build_explorer(&settings).unwrap();
    assert_eq!(explorer.oracle().position_name(), "A");
}

#[test]
fn build_explorer_rejects_unknown_start() {
    let settings = ExplorerSettings {
        layout: MazeKind::Corridor,
        start_node: Some("Q".to_string()),
        ..Default::default()
    };
    assert_eq!(
        build_explorer(&settings).err(),
        Some(ExplorerError::UnknownNode("Q".to_string()))
    );
}

// ==================== Session ====================

#[test]
fn session_stops_after_max_runs() {
    let layout = MazeKind::Corridor.layout().unwrap();
    let explorer = seeded_explorer(layout.build().unwrap(), layout.start, 3);
    let (commands, events, handle) = spawn_session(explorer, Some(3), Duration::from_millis(1));

    commands.send(UiToSession::StartExploration).unwrap();
    let events = drain_until_ended(&events);

    let indices: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            SessionToUi::RunCompleted(report) => Some(report.run_index),
            _ => None,
        })
        .collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert_eq!(events.last(), Some(&SessionToUi::Ended { runs: 3 }));
    assert_eq!(handle.join().unwrap(), Ok(3));
}

#[test]
fn session_waits_for_start() {
    let layout = MazeKind::Corridor.layout().unwrap();
    let explorer = seeded_explorer(layout.build().unwrap(), layout.start, 3);
    let (commands, events, handle) = spawn_session(explorer, None, Duration::from_millis(1));

    // not running yet: pausing is rejected and the map is still empty
    commands.send(UiToSession::PauseExploration).unwrap();
    commands.send(UiToSession::RequestSnapshot).unwrap();
    commands.send(UiToSession::EndExploration).unwrap();

    let events = drain_until_ended(&events);
    assert_eq!(events.len(), 2);
    match &events[0] {
        SessionToUi::Snapshot(snapshot) => {
            assert!(snapshot.nodes.is_empty());
            assert!(snapshot.target.is_none());
        }
        other => panic!("expected a snapshot, got {other:?}"),
    }
    assert_eq!(events[1], SessionToUi::Ended { runs: 0 });
    assert_eq!(handle.join().unwrap(), Ok(0));
}

#[test]
fn paused_session_keeps_its_master_map() {
    let layout = MazeKind::Corridor.layout().unwrap();
    let explorer = seeded_explorer(layout.build().unwrap(), layout.start, 11);
    let (commands, events, handle) = spawn_session(explorer, None, Duration::from_millis(5));

    commands.send(UiToSession::StartExploration).unwrap();
    let first = events.recv_timeout(Duration::from_secs(10)).unwrap();
    assert!(matches!(first, SessionToUi::RunCompleted(_)));

    commands.send(UiToSession::PauseExploration).unwrap();
    commands.send(UiToSession::RequestSnapshot).unwrap();
    commands.send(UiToSession::EndExploration).unwrap();

    let mut runs_seen = 1;
    let mut snapshot = None;
    for event in drain_until_ended(&events) {
        match event {
            SessionToUi::RunCompleted(_) => runs_seen += 1,
            SessionToUi::Snapshot(s) => snapshot = Some(s),
            SessionToUi::Ended { runs } => assert_eq!(runs, runs_seen),
            SessionToUi::TargetUnreachable(err) => panic!("unexpected failure {err}"),
        }
    }

    let snapshot = snapshot.unwrap();
    assert_eq!(snapshot.nodes.len(), 3);
    assert_eq!(snapshot.arcs.len(), 2);
    assert!(snapshot.target.is_some());
    assert_eq!(handle.join().unwrap(), Ok(runs_seen));
}

#[test]
fn unreachable_target_ends_the_session() {
    let explorer = seeded_explorer(unreachable_maze(), "A", 5);
    let (commands, events, handle) = spawn_session(explorer, None, Duration::from_millis(1));

    commands.send(UiToSession::StartExploration).unwrap();
    let events = drain_until_ended(&events);

    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        SessionToUi::TargetUnreachable(ExplorerError::TargetUnreachable { explored: 2, .. })
    ));
    assert_eq!(events[1], SessionToUi::Ended { runs: 0 });

    let err = handle.join().unwrap().unwrap_err();
    assert!(!err.is_retriable());
}

#[test]
fn dropped_ui_closes_the_session() {
    let layout = MazeKind::Corridor.layout().unwrap();
    let explorer = seeded_explorer(layout.build().unwrap(), layout.start, 1);
    let (commands, _events, handle) = spawn_session(explorer, None, Duration::from_millis(1));

    drop(commands);
    assert!(matches!(handle.join().unwrap(), Err(ExplorerError::ChannelClosed(_))));
}
