//! Loupe Bridge Server
//!
//! Per-project local HTTP endpoint that resolves inspect requests from the
//! browser overlay, performs the path-containment check, returns
//! source-line windows, and hands off to the editor-launch operation.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::launch::CommandLauncher;
use crate::options::{Hooks, ServerOptions};
use crate::port::ScanPortFinder;
use crate::record::MemoryRecordStore;

mod bootstrap;
mod launch;
mod options;
mod port;
mod project;
mod record;
mod routes;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut options = ServerOptions::from_env();
    options.print_server = true;

    let launcher = match std::env::var("LOUPE_LAUNCH_COMMAND") {
        Ok(template) if !template.is_empty() => CommandLauncher::new(template),
        _ => CommandLauncher::default(),
    };

    let port = bootstrap::start_server(
        options,
        Hooks::default(),
        Arc::new(MemoryRecordStore::new()),
        Arc::new(ScanPortFinder::default()),
        Arc::new(launcher),
    )
    .await;

    match port {
        Ok(port) => {
            tracing::info!(port, "bridge server ready, press Ctrl-C to stop");
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(%err, "failed to wait for shutdown signal");
            }
        }
        Err(err) => {
            tracing::error!(%err, "bridge server failed to start");
            std::process::exit(1);
        }
    }
}
