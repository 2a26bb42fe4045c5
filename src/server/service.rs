use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use super::routes::{router, AppState};
use crate::config::Settings;

/// Binds the configured listener and serves until SIGINT/SIGTERM.
pub async fn run(settings: Settings) -> Result<()> {
    let addr: SocketAddr = settings
        .server
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", settings.server.listen))?;

    let state = AppState::new(settings.upstream.clone())?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind listener at {}", addr))?;

    info!(
        "Listening on {}, forwarding to {}",
        addr, settings.upstream.api_base
    );

    serve(listener, state, wait_for_shutdown()).await?;

    info!("Server stopped");
    Ok(())
}

/// Serves the update API on an already-bound listener until `shutdown`
/// resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                _ => {
                    tracing::error!("Failed to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(windows)]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl+C");
    }
}
