//! HTTP service command handler.

use omni::{AppState, OmniConfig, OmniResult};
use tracing::info;

/// Run the story API until Ctrl+C.
///
/// Starts even without a credential; generation requests then fail with the
/// configuration message.
pub async fn run_serve(config: &OmniConfig, addr: Option<String>) -> OmniResult<()> {
    let addr = addr.unwrap_or_else(|| config.server.addr.clone());
    let state = AppState::from_config(config);
    info!(addr = %addr, model = %config.gemini.model, "Starting story service");
    omni::serve(&addr, state).await
}
