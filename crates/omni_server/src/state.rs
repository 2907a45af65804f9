//! Shared handler state.

use omni_core::ValidationPolicy;
use omni_error::ConfigError;
use omni_interface::StoryDriver;
use omni_models::{GeminiClient, GeminiConfig, OmniConfig};
use omni_story::StoryGenerator;
use std::sync::Arc;
use tracing::{info, warn};

/// Generator shared by all requests.
pub type SharedGenerator = StoryGenerator<Arc<dyn StoryDriver>>;

#[derive(Clone)]
enum Backend {
    Ready(Arc<SharedGenerator>),
    Unconfigured(String),
}

/// API state: the story generator, or the reason there is none.
///
/// A missing credential does not stop the server from starting; generation
/// requests fail with a configuration error instead.
#[derive(Clone)]
pub struct AppState {
    backend: Backend,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            Backend::Ready(generator) => generator.driver().provider_name(),
            Backend::Unconfigured(_) => "unconfigured",
        };
        f.debug_struct("AppState")
            .field("backend", &backend)
            .finish()
    }
}

impl AppState {
    /// State backed by a driver.
    pub fn new(driver: Arc<dyn StoryDriver>, policy: ValidationPolicy) -> Self {
        Self {
            backend: Backend::Ready(Arc::new(StoryGenerator::with_policy(driver, policy))),
        }
    }

    /// State with no usable driver; generation reports `message`.
    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unconfigured(message.into()),
        }
    }

    /// Gemini-backed state from configuration and the environment.
    pub fn from_config(config: &OmniConfig) -> Self {
        let client = GeminiConfig::from_env(&config.gemini).and_then(GeminiClient::new);
        match client {
            Ok(client) => {
                info!(model = %config.gemini.model, "Gemini driver ready");
                Self::new(Arc::new(client), config.story.validation)
            }
            Err(e) => {
                warn!(error = %e, "Story generation unavailable");
                Self::unconfigured(e.user_message())
            }
        }
    }

    /// The generator, or a configuration error.
    pub fn generator(&self) -> Result<&Arc<SharedGenerator>, ConfigError> {
        match &self.backend {
            Backend::Ready(generator) => Ok(generator),
            Backend::Unconfigured(message) => Err(ConfigError::new(message.clone())),
        }
    }
}
