//! Stepwise Visualization Server
//!
//! Configure a demo run and serve the control API.

use stepwise_graph::{Graph, GraphAlgorithm};
use stepwise_vis::{RunConfig, Session, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Four-node diamond searched breadth-first from A to D.
fn demo_graph() -> Graph {
    Graph::new()
        .with_node("A", 0)
        .with_node("B", 3)
        .with_node("C", 5)
        .with_node("D", 2)
        .with_edge("A", "B")
        .with_edge("A", "C")
        .with_edge("B", "D")
        .with_edge("C", "D")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepwise=info,stepwise_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = VisConfig::from_env()?;
    tracing::info!(?config, "Starting Stepwise");

    let session = Session::new();
    session
        .configure(RunConfig::graph(
            demo_graph(),
            "A",
            "D",
            GraphAlgorithm::Bfs,
            config.graph_speed_ms,
        ))
        .await?;

    let server = VisServer::new(session, config);
    server.serve().await?;

    Ok(())
}
