//! Server bootstrap: port negotiation guarded by the project record.
//!
//! Per-process lifecycle is `uninitialized -> negotiating-port ->
//! listening`. The first caller for a project takes the one-shot `find_port`
//! guard and negotiates; concurrent callers wait for the recorded port
//! instead of binding a second one. Once a port is recorded every later
//! call short-circuits.

use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use crate::launch::EditorLauncher;
use crate::options::{Hooks, ServerOptions};
use crate::port::PortFinder;
use crate::project;
use crate::record::RecordStore;
use crate::routes::{self, AppState};

/// How long a concurrent caller waits for the negotiating caller's port.
const NEGOTIATION_WAIT: Duration = Duration::from_millis(50);
const NEGOTIATION_ATTEMPTS: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("no usable port: {0}")]
    Port(#[source] io::Error),
    #[error("failed to bind listener: {0}")]
    Bind(#[source] io::Error),
    #[error("port negotiation did not complete")]
    NegotiationTimeout,
}

/// Starts the bridge server for the current project, or returns the
/// already-negotiated port. The listener itself runs on a detached task;
/// the returned port is immediately usable by the overlay.
pub async fn start_server(
    options: ServerOptions,
    hooks: Hooks,
    store: Arc<dyn RecordStore>,
    finder: Arc<dyn PortFinder>,
    launcher: Arc<dyn EditorLauncher>,
) -> Result<u16, StartError> {
    let root = options.root_dir.clone().or_else(project::project_root);
    let project = root
        .as_ref()
        .map_or_else(|| "default".to_string(), |p| p.display().to_string());

    if let Some(port) = store.get(&project).port {
        return Ok(port);
    }

    if !store.try_begin_find(&project) {
        // Another caller holds the guard; wait for its recorded port.
        for _ in 0..NEGOTIATION_ATTEMPTS {
            if let Some(port) = store.get(&project).port {
                return Ok(port);
            }
            tokio::time::sleep(NEGOTIATION_WAIT).await;
        }
        return Err(StartError::NegotiationTimeout);
    }

    let port = finder.find_free_port(options.port).map_err(StartError::Port)?;
    let listener = tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .map_err(StartError::Bind)?;
    store.set_port(&project, port);

    if options.print_server {
        let ip = options.ip.as_deref().unwrap_or("localhost");
        tracing::info!("[loupe] Server is running on http://{ip}:{port}");
    }
    tracing::debug!(%project, port, "bridge server listening");

    let state = Arc::new(AppState {
        options,
        root,
        launcher,
        hooks,
    });
    let app = routes::router(state);
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(%err, "bridge server exited");
        }
    });

    Ok(port)
}
