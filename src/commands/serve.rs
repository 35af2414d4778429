use crate::api::{self, AppState};
use crate::config::AdminConfig;
use crate::error::Result;
use crate::relay::TokioCommandRunner;
use anyhow::Context;
use std::sync::Arc;

/// Run the dashboard server until Ctrl-C
///
/// Stores are opened before the listener is bound and closed after the
/// server has drained.
pub async fn run_server(config: AdminConfig) -> Result<()> {
    let addr = config.bind_addr()?;
    let state = AppState::new(config, Arc::new(TokioCommandRunner))?;
    let router = api::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!(
        %addr,
        version = state.version,
        ui_dir = ?state.config.server.ui_dir,
        "maruadmin listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("ctrl-c received; shutting down");
        })
        .await
        .context("server error")?;

    state.history.close()?;
    tracing::info!("stores closed");
    Ok(())
}
