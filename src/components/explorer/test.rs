/// Explorer tests

#[cfg(test)]
mod tests {
    use crate::components::explorer::localization::*;
    use crate::components::explorer::search::DirectionChoices;
    use crate::components::explorer::*;
    use crate::components::graph::{Graph, Node};
    use crate::components::oracle::{DirectionOracle, GraphWalker};
    use crate::utils::direction::{Direction, Exits};
    use crate::utils::registry::{MazeKind, MazeLayout};

    use rand::RngCore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rustc_hash::FxHashMap;

    use Direction::{East, North, South, West};

    // ==================== Helper Functions ====================

    /// Always yields zero: remaining directions are then tried in N, E, S, W order.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    type TestExplorer = Explorer<GraphWalker<ZeroRng>, ZeroRng>;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn explorer_on(maze: Graph, start: &str) -> TestExplorer {
        init_logger();
        let walker = GraphWalker::with_rng(maze, start, ZeroRng).unwrap();
        Explorer::with_rng(1, walker, ZeroRng)
    }

    fn explorer_for(kind: MazeKind) -> TestExplorer {
        let layout = kind.layout().unwrap();
        explorer_on(layout.build().unwrap(), layout.start)
    }

    /// T(S) target on top of X1; X1 and X2 look the same (NES) but only X1
    /// has a dead end (N) below it.
    ///
    /// ```text
    ///         P
    ///   T     X2 - Y
    ///   X1 -  M
    ///   D1
    /// ```
    const LOOKALIKES: MazeLayout = MazeLayout {
        nodes: &[
            ("T", "S", (0, 1)),
            ("X1", "NES", (0, 0)),
            ("D1", "N", (0, -1)),
            ("M", "NW", (1, 0)),
            ("X2", "NES", (1, 1)),
            ("P", "S", (1, 2)),
            ("Y", "W", (2, 1)),
        ],
        arcs: &[
            ("X1", North, "T"),
            ("X1", South, "D1"),
            ("X1", East, "M"),
            ("M", North, "X2"),
            ("X2", North, "P"),
            ("X2", East, "Y"),
        ],
        target: "T",
        start: "D1",
    };

    /// Graph distance of every node to the target, computed by relaxing the arc list.
    fn distances_to_target(graph: &Graph) -> FxHashMap<String, usize> {
        let target = graph.node(graph.target().unwrap()).unwrap().name().to_string();
        let mut dist: FxHashMap<String, usize> = FxHashMap::default();
        dist.insert(target, 0);
        for _ in 0..graph.node_count() {
            for (a, b) in graph.list_arcs() {
                let da = dist.get(&a).copied();
                let db = dist.get(&b).copied();
                if let Some(d) = db {
                    if da.is_none_or(|x| x > d + 1) {
                        dist.insert(a.clone(), d + 1);
                    }
                }
                if let Some(d) = da {
                    if db.is_none_or(|x| x > d + 1) {
                        dist.insert(b.clone(), d + 1);
                    }
                }
            }
        }
        dist
    }

    // ==================== DirectionChoices Tests ====================

    mod choices_tests {
        use super::*;

        #[test]
        fn test_preferred_come_first_in_order() {
            let mut choices = DirectionChoices::new(vec![North, East, South, West]);
            choices.prefer(South);
            choices.prefer(West);
            choices.prefer(South);
            assert_eq!(choices.preferred(), vec![South, West]);

            let mut rng = ZeroRng;
            let order: Vec<Direction> = std::iter::from_fn(|| choices.next(&mut rng)).collect();
            assert_eq!(order, vec![South, West, North, East]);
            assert!(choices.is_empty());
        }

        #[test]
        fn test_unavailable_suggestion_is_ignored() {
            let mut choices = DirectionChoices::new(vec![East]);
            choices.prefer(North);
            assert!(choices.preferred().is_empty());
            assert_eq!(choices.next(&mut ZeroRng), Some(East));
            assert_eq!(choices.next(&mut ZeroRng), None);
        }

        #[test]
        fn test_random_order_covers_everything() {
            let mut rng = StdRng::seed_from_u64(3);
            let mut choices = DirectionChoices::new(vec![North, East, South, West]);
            let mut seen: Vec<Direction> = std::iter::from_fn(|| choices.next(&mut rng)).collect();
            seen.sort_by_key(|d| d.index());
            assert_eq!(seen, vec![North, East, South, West]);
        }
    }

    // ==================== Pathfinding Tests ====================

    mod pathfinding_tests {
        use super::*;
        use crate::components::map_builder::MasterMap;

        #[test]
        fn test_shortest_direction_is_optimal_on_labyrinth() {
            let maze = MazeKind::Labyrinth.layout().unwrap().build().unwrap();
            let dist = distances_to_target(&maze);
            assert_eq!(dist.len(), 25);
            let master = MasterMap::from_graph(maze.clone());

            for (id, node) in maze.nodes() {
                let expected = dist[node.name()];
                let path = master.shortest_path(id).unwrap();
                assert_eq!(path.len(), expected, "path length from {}", node.name());

                // walking the path really ends on the target
                let mut at = id;
                for dir in &path {
                    at = maze.neighbor(at, *dir).unwrap();
                }
                assert_eq!(Some(at), maze.target());

                match master.shortest_direction(id) {
                    Some(dir) => {
                        let next = maze.node(maze.neighbor(id, dir).unwrap()).unwrap();
                        assert_eq!(dist[next.name()] + 1, expected);
                    }
                    None => assert_eq!(expected, 0),
                }
            }
        }

        #[test]
        fn test_no_direction_when_cut_off() {
            let mut graph = Graph::new();
            let a = graph.add_node(Node::new("A", Exits::from_letters("E"))).unwrap();
            let mut t = Node::new("T", Exits::from_letters("W")).at(5, 5);
            t.is_target = true;
            let t = graph.add_node(t).unwrap();
            let master = MasterMap::from_graph(graph);
            assert_eq!(master.shortest_direction(a), None);
            assert_eq!(master.shortest_path(a), None);
            assert_eq!(master.shortest_path(t), Some(vec![]));
        }

        #[test]
        fn test_empty_master_has_no_path() {
            let master = MasterMap::new();
            assert_eq!(master.shortest_direction(crate::components::graph::NodeId(0)), None);
        }
    }

    // ==================== Localization Tests ====================

    mod localization_tests {
        use super::*;
        use crate::components::map_builder::MasterMap;

        fn sig(letters: &str) -> PathStep {
            PathStep::Node(Exits::from_letters(letters).signature())
        }

        fn lookalike_master() -> MasterMap {
            MasterMap::from_graph(LOOKALIKES.build().unwrap())
        }

        #[test]
        fn test_diverging_candidate_is_discarded() {
            let master = lookalike_master();
            let path = vec![sig("N"), PathStep::Move(North), sig("NES")];
            let hypotheses = localize(&master, &path);
            assert_eq!(hypotheses.len(), 1);
            assert_eq!(hypotheses[0].name, "X1");
            assert_eq!(hypotheses[0].score, 2);
        }

        #[test]
        fn test_ties_sorted_by_name_descending() {
            let master = lookalike_master();
            let hypotheses = localize(&master, &[sig("NES")]);
            let ranked: Vec<(&str, usize)> = hypotheses.iter().map(|h| (h.name.as_str(), h.score)).collect();
            assert_eq!(ranked, vec![("X2", 1), ("X1", 1)]);
        }

        #[test]
        fn test_score_stops_where_master_runs_out() {
            // the master never explored what lies west of A
            let mut graph = Graph::new();
            let a = graph.add_node(Node::new("A", Exits::from_letters("EW"))).unwrap();
            let mut t = Node::new("T", Exits::from_letters("W")).at(1, 0);
            t.is_target = true;
            let t = graph.add_node(t).unwrap();
            graph.add_arc(a, East, t);
            let master = MasterMap::from_graph(graph);

            let path = vec![sig("E"), PathStep::Move(East), sig("EW")];
            let hypotheses = localize(&master, &path);
            assert_eq!(hypotheses.len(), 1);
            assert_eq!(hypotheses[0].score, 1);
        }

        #[test]
        fn test_target_is_never_a_candidate() {
            let master = lookalike_master();
            // T and P share the "S" signature, only P can be where we stand
            let names: Vec<String> = localize(&master, &[sig("S")])
                .into_iter()
                .map(|h| h.name)
                .collect();
            assert_eq!(names, vec!["P".to_string()]);
            assert!(localize(&master, &[]).is_empty());
        }

        #[test]
        fn test_ambiguous_history_yields_one_preferred_direction() {
            let mut explorer = explorer_on(LOOKALIKES.build().unwrap(), "D1");
            explorer.master = lookalike_master();

            let exits = explorer.oracle.sense();
            explorer.builder.record_and_connect(exits);
            explorer.path.push(PathStep::Node(exits.signature()));
            explorer.travel(North);

            let choices = explorer.rank_directions(Some(North));
            assert_eq!(choices.preferred(), vec![North]);
        }

        #[test]
        fn test_no_history_prefers_every_suggestion() {
            let mut explorer = explorer_on(LOOKALIKES.build().unwrap(), "X1");
            explorer.master = lookalike_master();

            let exits = explorer.oracle.sense();
            explorer.builder.record_and_connect(exits);
            explorer.path.push(PathStep::Node(exits.signature()));

            let choices = explorer.rank_directions(None);
            assert_eq!(choices.preferred(), vec![South, North]);
        }
    }

    // ==================== Run Tests ====================

    mod run_tests {
        use super::*;

        #[test]
        fn test_corridor_first_run() {
            let mut explorer = explorer_for(MazeKind::Corridor);
            let report = explorer.run_once().unwrap();

            assert_eq!(report.run_index, 1);
            assert_eq!(report.start.as_deref(), Some("A"));
            assert_eq!(report.moves, vec![East, East]);
            assert_eq!((report.master_nodes, report.master_arcs), (3, 2));
            assert_eq!(report.anchor.unwrap().to_string(), "C [2,0]");
            assert_eq!(explorer.state(), ExplorerState::TargetFound);
            assert!(explorer.state().is_terminal());
            assert!(!explorer.state().is_moving());
            assert_eq!(explorer.runs_completed(), 1);

            let snapshot = explorer.snapshot();
            assert!(snapshot.has_arc("A", "B"));
            assert!(snapshot.has_arc("B", "C"));
        }

        #[test]
        fn test_corridor_second_run_goes_straight() {
            let mut explorer = explorer_for(MazeKind::Corridor);
            explorer.oracle_mut().queue_start("B").unwrap();
            explorer.run_once().unwrap();

            let report = explorer.run_once().unwrap();
            assert_eq!(report.start.as_deref(), Some("B"));
            assert_eq!(report.moves, vec![East]);
            assert_eq!((report.learned_nodes, report.learned_arcs), (0, 0));
            assert_eq!(report.anchor.unwrap().to_string(), "C [2,0]");
        }

        #[test]
        fn test_dead_end_square_long_way_round() {
            let mut explorer = explorer_for(MazeKind::DeadEndSquare);
            let report = explorer.run_once().unwrap();

            // north into the dead end, back, then east and north
            assert_eq!(report.moves, vec![North, South, East, North]);

            let snapshot = explorer.snapshot();
            let nodes: Vec<String> = snapshot.nodes.iter().map(|n| n.to_string()).collect();
            assert_eq!(nodes, vec!["A [0,0]", "B [0,1]", "C [1,0]", "D [1,1]"]);
            assert_eq!(snapshot.arcs.len(), 3);
            assert!(snapshot.has_arc("A", "B"));
            assert!(snapshot.has_arc("A", "C"));
            assert!(snapshot.has_arc("C", "D"));
            assert!(!snapshot.has_arc("B", "D"));
            assert_eq!(snapshot.target.unwrap().to_string(), "D [1,1]");
        }

        #[test]
        fn test_dead_end_square_second_run_uses_master() {
            let mut explorer = explorer_for(MazeKind::DeadEndSquare);
            explorer.oracle_mut().queue_start("B").unwrap();
            explorer.run_once().unwrap();

            let report = explorer.run_once().unwrap();
            assert_eq!(report.start.as_deref(), Some("B"));
            assert_eq!(report.moves, vec![South, East, North]);
            assert_eq!((report.learned_nodes, report.learned_arcs), (0, 0));
            assert_eq!(report.anchor.unwrap().to_string(), "D [1,1]");
        }

        #[test]
        fn test_loop_is_closed_without_walking_it() {
            let mut explorer = explorer_for(MazeKind::Loop);
            let report = explorer.run_once().unwrap();

            assert_eq!(report.moves, vec![North, East, South, East]);
            assert_eq!((report.master_nodes, report.master_arcs), (5, 5));

            let snapshot = explorer.snapshot();
            // A(0,0) B(0,1) C(1,1) D(1,0) E(2,0) in discovery order
            assert!(snapshot.has_arc("D", "A"));
            assert_eq!(snapshot.node("D").map(|n| (n.x, n.y)), Some((1, 0)));
            assert_eq!(snapshot.target.unwrap().to_string(), "E [2,0]");
        }

        #[test]
        fn test_start_on_target() {
            let mut explorer = explorer_for(MazeKind::Corridor);
            explorer.oracle_mut().place_at("C").unwrap();
            let report = explorer.run_once().unwrap();
            assert!(report.moves.is_empty());
            assert_eq!((report.master_nodes, report.master_arcs), (1, 0));
            assert_eq!(report.anchor.unwrap().to_string(), "A [0,0]");
        }

        #[test]
        fn test_unreachable_target() {
            let layout = MazeLayout {
                nodes: &[("A", "E", (0, 0)), ("B", "W", (1, 0)), ("C", "", (5, 5))],
                arcs: &[("A", East, "B")],
                target: "C",
                start: "A",
            };
            let mut explorer = explorer_on(layout.build().unwrap(), "A");

            let err = explorer.run_once().unwrap_err();
            assert_eq!(
                err,
                crate::utils::error::ExplorerError::TargetUnreachable {
                    start: "A".to_string(),
                    explored: 2
                }
            );
            assert!(!err.is_retriable());
            assert_eq!(explorer.state(), ExplorerState::Exhausted);
            assert!(explorer.state().is_terminal());
            assert!(explorer.master().is_empty());
            assert!(explorer.builder().graph().is_empty());
            assert_eq!(explorer.runs_completed(), 0);
            // the walker came back to where it started
            assert_eq!(explorer.oracle().position_name(), "A");
            assert_eq!(explorer.oracle().moves(), &[East, West]);
        }

        #[test]
        fn test_traverse_stops_when_told() {
            let mut explorer = explorer_for(MazeKind::Corridor);
            let mut seen = Vec::new();
            let runs = explorer
                .traverse(|report| {
                    seen.push(report.run_index);
                    report.run_index < 3
                })
                .unwrap();
            assert_eq!(runs, 3);
            assert_eq!(seen, vec![1, 2, 3]);
        }
    }

    // ==================== Multi-run Tests ====================

    mod session_run_tests {
        use super::*;

        #[test]
        fn test_labyrinth_master_stays_consistent() {
            init_logger();
            let layout = MazeKind::Labyrinth.layout().unwrap();
            let maze = layout.build().unwrap();
            let walker = GraphWalker::with_rng(maze.clone(), layout.start, StdRng::seed_from_u64(11)).unwrap();
            let mut explorer = Explorer::seeded(1, walker, 42);

            let mut anchors = Vec::new();
            let mut master_nodes = 0;
            explorer
                .traverse(|report| {
                    assert!(report.master_nodes >= master_nodes);
                    master_nodes = report.master_nodes;
                    anchors.push(report.anchor.clone());
                    report.run_index < 12
                })
                .unwrap();

            let first = anchors[0].clone().unwrap();
            assert!(anchors.iter().all(|a| a.as_ref() == Some(&first)));

            // every master node sits on the maze cell with the same exits,
            // once both frames are aligned on the target
            let m = maze.node(maze.target().unwrap()).unwrap();
            let (dx, dy) = (m.x - first.x, m.y - first.y);
            let cells: FxHashMap<(i32, i32), &Node> =
                maze.nodes().map(|(_, n)| (n.coordinates(), n)).collect();
            let master = explorer.master().graph();
            assert!(master.node_count() <= 25);
            for (_, node) in master.nodes() {
                let cell = cells[&(node.x + dx, node.y + dy)];
                assert_eq!(cell.signature(), node.signature(), "master node {}", node.name());
            }
            for (a, b) in master.list_arcs() {
                let a = master.node_by_name(&a).unwrap();
                let b = master.node_by_name(&b).unwrap();
                let ca = cells[&(a.x + dx, a.y + dy)].name();
                let cb = cells[&(b.x + dx, b.y + dy)].name();
                assert!(maze.contains_arc_between(ca, cb), "{ca}<-->{cb} is not in the maze");
            }
        }
    }
}
