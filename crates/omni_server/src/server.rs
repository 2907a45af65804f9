//! Listener lifecycle.

use crate::{AppState, create_router};
use omni_error::{OmniResult, ServerError, ServerErrorKind};
use tracing::{info, instrument};

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns a server error if the address cannot be bound or the server loop
/// fails.
#[instrument(skip(state))]
pub async fn serve(addr: &str, state: AppState) -> OmniResult<()> {
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })
    })?;

    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| addr.to_string());
    info!(addr = %local, "Omni server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    info!("Omni server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
