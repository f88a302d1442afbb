// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `engram status` command implementation.
//!
//! Connects to a running server over the same client the agent runtime
//! uses and prints health plus store statistics.

use engram_config::EngramConfig;
use engram_core::EngramError;

/// Runs the `engram status` command.
pub async fn run_status(config: EngramConfig) -> Result<(), EngramError> {
    let base_url = format!("http://{}:{}", config.server.host, config.server.port);
    let service = engram_client::self_hosted(&base_url)?;

    match service.health().await {
        Ok(health) => {
            println!("engram server at {base_url}: {} (v{})", health.status, health.version);
        }
        Err(e) => {
            eprintln!("engram server at {base_url} is unreachable: {e}");
            std::process::exit(1);
        }
    }

    let stats = service.stats().await?;
    println!(
        "memories: {}  facts: {}  containers: {}",
        stats.memories,
        stats.facts,
        if stats.containers.is_empty() {
            "(none)".to_string()
        } else {
            stats.containers.join(", ")
        }
    );

    Ok(())
}
