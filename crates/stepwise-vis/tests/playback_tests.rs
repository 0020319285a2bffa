//! End-to-end playback over both algorithm families.

use std::time::Duration;

use proptest::prelude::*;
use stepwise_graph::{Graph, GraphAlgorithm, NodeId};
use stepwise_sort::SortAlgorithm;
use stepwise_vis::{
    metrics_csv, Frame, Playback, PlaybackState, PerformanceMetrics, RunConfig, Session, SessionExport, Snapshot,
};

fn diamond() -> Graph {
    Graph::new()
        .with_node("A", 0)
        .with_node("B", 0)
        .with_node("C", 0)
        .with_node("D", 0)
        .with_edge("A", "B")
        .with_edge("A", "C")
        .with_edge("B", "D")
        .with_edge("C", "D")
}

fn ids(names: &[&str]) -> Vec<NodeId> {
    names.iter().map(|n| NodeId::new(*n)).collect()
}

fn run_to_end(playback: &mut Playback) -> Vec<Frame> {
    let mut frames = Vec::new();
    while let Some(frame) = playback.step().unwrap() {
        frames.push(frame);
    }
    frames
}

fn graph_snapshot(frame: &Frame) -> &stepwise_graph::GraphSnapshot {
    match &frame.snapshot {
        Some(Snapshot::Graph(s)) => s,
        other => panic!("expected graph snapshot, got {other:?}"),
    }
}

fn sort_snapshot(frame: &Frame) -> &stepwise_sort::SortSnapshot {
    match &frame.snapshot {
        Some(Snapshot::Sort(s)) => s,
        other => panic!("expected sort snapshot, got {other:?}"),
    }
}

#[test]
fn bfs_diamond_finds_target_on_fourth_pop() {
    let mut playback =
        Playback::with_config(RunConfig::graph(diamond(), "A", "D", GraphAlgorithm::Bfs, 500)).unwrap();
    let frames = run_to_end(&mut playback);

    assert_eq!(frames.len(), 4);
    let order: Vec<NodeId> = frames
        .iter()
        .filter_map(|f| graph_snapshot(f).current_node.clone())
        .collect();
    assert_eq!(order, ids(&["A", "B", "C", "D"]));

    let last = frames.last().unwrap();
    assert_eq!(last.state, PlaybackState::Complete);
    assert!(last.metrics.is_complete);
    assert_eq!(last.metrics.nodes_explored, 4);
    assert_eq!(last.metrics.total_nodes, 4);
    assert_eq!(last.metrics.step_count, 4);
    assert!(last.metrics.memory_usage_kb > 0);
    assert_eq!(last.explanation.as_deref(), Some("step 4: D: target found"));
}

#[test]
fn bubble_opens_with_compare_then_swap() {
    let mut playback =
        Playback::with_config(RunConfig::sort(vec![5, 3, 1, 4, 2], SortAlgorithm::Bubble, 50)).unwrap();

    let first = playback.step().unwrap().unwrap();
    let first = sort_snapshot(&first);
    assert_eq!(first.comparing.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(&first.array[..2], &[5, 3]);

    let second = playback.step().unwrap().unwrap();
    let second = sort_snapshot(&second);
    assert_eq!(second.swapping.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(second.array, vec![3, 5, 1, 4, 2]);
}

#[test]
fn start_equal_to_target_succeeds_on_first_pop() {
    let mut playback =
        Playback::with_config(RunConfig::graph(diamond(), "B", "B", GraphAlgorithm::Dfs, 500)).unwrap();
    let frames = run_to_end(&mut playback);

    assert_eq!(frames.len(), 1);
    let snapshot = graph_snapshot(&frames[0]);
    assert_eq!(snapshot.explored_nodes.iter().cloned().collect::<Vec<_>>(), ids(&["B"]));
    assert_eq!(snapshot.current_path, ids(&["B"]));
    assert_eq!(playback.state(), PlaybackState::Complete);
}

#[test]
fn alpha_beta_prunes_through_playback() {
    let tree = Graph::new()
        .with_node("A", 0)
        .with_node("B", 0)
        .with_node("C", 0)
        .with_node("D", 3)
        .with_node("E", 5)
        .with_node("F", 2)
        .with_node("G", 9)
        .with_edge("A", "B")
        .with_edge("A", "C")
        .with_edge("B", "D")
        .with_edge("B", "E")
        .with_edge("C", "F")
        .with_edge("C", "G");
    let mut playback =
        Playback::with_config(RunConfig::graph(tree, "A", "A", GraphAlgorithm::AlphaBeta, 500)).unwrap();
    let frames = run_to_end(&mut playback);

    let last = graph_snapshot(frames.last().unwrap());
    assert_eq!(last.node_values.get(&NodeId::new("A")), Some(&3));
    assert!(last.pruned_nodes.contains(&NodeId::new("G")));
    assert!(frames.iter().any(|f| f
        .explanation
        .as_deref()
        .is_some_and(|e| e.contains("alpha >= beta"))));
}

#[test]
fn reset_after_completion_replays_identically() {
    let config = RunConfig::sort(vec![4, 2, 7, 1], SortAlgorithm::Quick, 50);
    let mut playback = Playback::with_config(config).unwrap();
    let first: Vec<_> = run_to_end(&mut playback).into_iter().map(|f| f.snapshot).collect();

    playback.reset().unwrap();
    assert_eq!(playback.state(), PlaybackState::Idle);
    let second: Vec<_> = run_to_end(&mut playback).into_iter().map(|f| f.snapshot).collect();
    assert_eq!(first, second);
}

#[test]
fn export_reflects_current_metrics() {
    let mut playback =
        Playback::with_config(RunConfig::graph(diamond(), "A", "D", GraphAlgorithm::Dfs, 500)).unwrap();
    run_to_end(&mut playback);

    let export = SessionExport::new(playback.metrics());
    assert_eq!(export.session_id.len(), 9);
    assert!(export.metrics.is_complete);
    assert!(export.to_json().unwrap().contains("\"nodes_explored\""));
    assert!(metrics_csv(&export.metrics).unwrap().contains("Completion Status,Complete"));
}

#[test]
fn session_steps_publish_frames() {
    tokio_test::block_on(async {
        let session = Session::new();
        session
            .configure(RunConfig::sort(vec![2, 1], SortAlgorithm::Insertion, 50))
            .await
            .unwrap();
        let mut frames = session.subscribe();

        let stepped = session.step().await.unwrap().unwrap();
        assert_eq!(frames.recv().await.unwrap(), stepped);

        let reset = session.reset().await.unwrap();
        assert_eq!(frames.recv().await.unwrap(), reset);
        assert_eq!(reset.metrics, PerformanceMetrics::default());
    });
}

#[tokio::test(start_paused = true)]
async fn timer_runs_sort_to_completion() {
    let session = Session::new();
    session
        .configure(RunConfig::sort(vec![3, 1, 2], SortAlgorithm::Bubble, 20))
        .await
        .unwrap();
    let total = stepwise_sort::generate(&[3, 1, 2], SortAlgorithm::Bubble).len();
    let mut frames = session.subscribe();

    session.start().await.unwrap();
    let mut received = 0;
    loop {
        let frame = frames.recv().await.unwrap();
        received += 1;
        if frame.state == PlaybackState::Complete {
            break;
        }
        assert_eq!(frame.state, PlaybackState::Running);
    }
    assert_eq!(received, total);
    assert_eq!(session.status().await.state, PlaybackState::Complete);
}

#[tokio::test(start_paused = true)]
async fn second_start_does_not_arm_another_timer() {
    let session = Session::new();
    session
        .configure(RunConfig::sort((0..40).rev().collect(), SortAlgorithm::Bubble, 10))
        .await
        .unwrap();

    session.start().await.unwrap();
    session.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(35)).await;

    assert_eq!(session.metrics().await.step_count, 3);
}

#[tokio::test(start_paused = true)]
async fn pause_stops_further_ticks() {
    let session = Session::new();
    session
        .configure(RunConfig::graph(diamond(), "A", "Z", GraphAlgorithm::Bfs, 100))
        .await
        .unwrap_err();
    session
        .configure(RunConfig::sort((0..30).rev().collect(), SortAlgorithm::Selection, 10))
        .await
        .unwrap();

    session.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(25)).await;
    let status = session.pause().await;
    assert_eq!(status.state, PlaybackState::Paused);
    let paused_at = session.metrics().await.step_count;
    assert_eq!(paused_at, 2);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(session.metrics().await.step_count, paused_at);

    // resume picks up where it stopped
    session.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(15)).await;
    assert_eq!(session.metrics().await.step_count, paused_at + 1);
}

proptest! {
    #[test]
    fn pause_steps_reset_returns_to_idle(
        array in prop::collection::vec(-100i64..100, 0..20),
        steps in 0usize..30,
        algorithm in prop::sample::select(SortAlgorithm::ALL.to_vec()),
    ) {
        let mut playback = Playback::with_config(RunConfig::sort(array, algorithm, 50)).unwrap();
        let initial = playback.frame();

        playback.start().unwrap();
        playback.pause();
        for _ in 0..steps {
            playback.step().unwrap();
        }
        playback.reset().unwrap();

        prop_assert_eq!(playback.state(), PlaybackState::Idle);
        prop_assert_eq!(playback.metrics(), PerformanceMetrics::default());
        prop_assert_eq!(playback.frame(), initial);
    }

    #[test]
    fn graph_reset_reinitializes_stepper(steps in 0usize..6, bfs in any::<bool>()) {
        let algorithm = if bfs { GraphAlgorithm::Bfs } else { GraphAlgorithm::Dfs };
        let mut playback = Playback::with_config(RunConfig::graph(diamond(), "A", "D", algorithm, 500)).unwrap();

        for _ in 0..steps {
            playback.step().unwrap();
        }
        playback.reset().unwrap();

        prop_assert_eq!(playback.state(), PlaybackState::Idle);
        prop_assert_eq!(playback.metrics(), PerformanceMetrics::default());
        prop_assert!(playback.frame().snapshot.is_none());
    }
}
