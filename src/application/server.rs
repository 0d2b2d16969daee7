use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::application::routes::app_router;
use crate::application::services::StatsInvalidator;
use crate::application::services::stats::stats_recomputation_task;
use crate::application::state::{AppState, AppStateConfig};
use crate::domain::ids::LibraryId;

/// Capacity of the stats invalidation channel. Signals beyond this are
/// dropped; the next read recomputes anyway.
const INVALIDATION_CHANNEL_CAPACITY: usize = 64;

pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub stats_debounce: Duration,
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let (stats_tx, stats_rx) =
        tokio::sync::mpsc::channel::<LibraryId>(INVALIDATION_CHANNEL_CAPACITY);
    let stats_invalidator = StatsInvalidator::new(stats_tx);

    let state = AppState::in_memory(AppStateConfig { stats_invalidator });

    // Spawn background stats recomputation task
    tokio::spawn(stats_recomputation_task(
        stats_rx,
        state.stats_service.clone(),
        config.stats_debounce,
    ));

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_address))?;

    let app = app_router(state);

    info!(
        address = %config.bind_address,
        debounce_ms = config.stats_debounce.as_millis(),
        "starting HTTP server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server shutdown complete");

    Ok(())
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if signal handlers fail
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
