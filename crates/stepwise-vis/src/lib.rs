//! Stepwise Visualization Runtime
//!
//! Drives a graph or sorting stepper under VCR-style playback and streams a
//! frame to subscribers after every step.
//!
//! # Architecture
//!
//! - **Stepper**: one trait over DFS/BFS, minimax/alpha-beta and sort timelines
//! - **Playback**: Idle / Running / Paused / Complete state machine that owns
//!   the active stepper and its metrics
//! - **Session**: timer loop and frame fan-out around a playback controller
//! - **REST / WebSocket**: control the run, fetch frames, export metrics
//!
//! # Usage
//!
//! ```ignore
//! let session = Session::new();
//! session
//!     .configure(RunConfig::sort(vec![5, 3, 1, 4, 2], SortAlgorithm::Bubble, 50))
//!     .await?;
//! session.start().await?;
//!
//! let server = VisServer::new(session, VisConfig::from_env()?);
//! server.serve().await?;
//! ```

mod config;
mod error;
mod export;
mod metrics;
mod playback;
mod scheduler;
mod server;
mod stepper;

pub use config::{
    RunConfig, RunInput, VisConfig, GRAPH_SPEED_RANGE_MS, MAX_GRAPH_NODES, MAX_SORT_LEN, SORT_SPEED_RANGE_MS,
};
pub use error::{Error, Result};
pub use export::{metrics_csv, session_id, SessionExport};
pub use metrics::{MetricsCollector, PerformanceMetrics, BYTES_PER_ENTRY};
pub use playback::{Frame, Playback, PlaybackState, PlaybackStatus, Tick, Ticket};
pub use scheduler::{Session, FRAME_CHANNEL_CAPACITY};
pub use server::VisServer;
pub use stepper::{build as build_stepper, Progress, Snapshot, Stepper};

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_graph::{Graph, GraphAlgorithm};
    use stepwise_sort::SortAlgorithm;

    #[test]
    fn graph_run_walks_to_completion() {
        let graph = Graph::new()
            .with_node("A", 0)
            .with_node("B", 0)
            .with_node("C", 0)
            .with_edge("A", "B")
            .with_edge("B", "C");
        let mut playback =
            Playback::with_config(RunConfig::graph(graph, "A", "C", GraphAlgorithm::Dfs, 500)).unwrap();

        let mut frames = Vec::new();
        while let Some(frame) = playback.step().unwrap() {
            frames.push(frame);
        }
        assert_eq!(frames.len(), 3);
        assert_eq!(playback.state(), PlaybackState::Complete);
        assert_eq!(playback.metrics().nodes_explored, 3);
    }

    #[test]
    fn sort_frames_follow_timeline() {
        let mut playback =
            Playback::with_config(RunConfig::sort(vec![2, 1, 3], SortAlgorithm::Selection, 50)).unwrap();
        let total = stepwise_sort::generate(&[2, 1, 3], SortAlgorithm::Selection).len();

        let mut count = 0;
        while let Some(frame) = playback.step().unwrap() {
            count += 1;
            match frame.snapshot {
                Some(Snapshot::Sort(s)) => assert_eq!(s.step_index, count - 1),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(count, total);
        assert_eq!(playback.metrics().step_count, total as u64);
        assert_eq!(playback.metrics().nodes_explored, 3);
    }
}
