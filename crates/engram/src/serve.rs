// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `engram serve` command implementation.
//!
//! Opens the WAL-mode SQLite store, wires the ingestion/retrieval/
//! maintenance services into the gateway, and serves until a shutdown
//! signal arrives. The database handle is checkpointed and closed before
//! the process exits.

use std::sync::Arc;

use engram_config::EngramConfig;
use engram_core::EngramError;
use engram_gateway::{start_server, GatewayState, ServerConfig};
use engram_storage::Database;
use tracing::info;

use crate::shutdown;

/// Runs the `engram serve` command.
pub async fn run_serve(config: EngramConfig) -> Result<(), EngramError> {
    init_tracing(&config.log.level);

    info!("starting engram serve");

    let db_path = config.storage.database_path();
    let db = Arc::new(Database::open(&db_path.to_string_lossy()).await?);
    info!(path = %db_path.display(), "storage initialized");

    let state = GatewayState::new(db.clone());

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    // Install signal handler; the server drains on cancellation.
    let cancel = shutdown::install_signal_handler();

    start_server(&server_config, state, cancel).await?;

    // Flush and close the store before exiting.
    db.close().await?;

    info!("engram serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("engram={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
