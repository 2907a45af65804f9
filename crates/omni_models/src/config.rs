//! Layered TOML configuration.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from omni.toml)
//! - User overrides (~/.config/omni/omni.toml, then ./omni.toml)
//! - Automatic merging with user values taking precedence
//!
//! Credentials never live in these files. [`GeminiConfig`] combines the
//! `[gemini]` section with the API key from the environment, and fails at
//! construction when the key is absent.

use config::{Config, File, FileFormat};
use omni_core::{MAX_IMAGES, ValidationPolicy};
use omni_error::{ConfigError, OmniError, OmniResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Primary environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GOOGLE_GEMINI_API_KEY";

/// Fallback environment variable for the Gemini API key.
pub const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// `[gemini]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeminiSettings {
    /// Model identifier, e.g. "gemini-2.0-flash"
    pub model: String,
    /// REST base URL up to and including the API version
    pub base_url: String,
    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Output token cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Ask the provider for `application/json` output
    #[serde(default)]
    pub json_mode: bool,
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
            max_output_tokens: None,
            json_mode: false,
        }
    }
}

/// `[intake]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IntakeSettings {
    /// Working-set capacity
    pub max_images: usize,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            max_images: MAX_IMAGES,
        }
    }
}

/// `[story]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorySettings {
    /// Minimum images before a session may generate
    pub min_images: usize,
    /// Handling of suggestions that break the frame contract
    #[serde(default)]
    pub validation: ValidationPolicy,
}

impl Default for StorySettings {
    fn default() -> Self {
        Self {
            min_images: 2,
            validation: ValidationPolicy::default(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Listen address
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
        }
    }
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExportSettings {
    /// Directory receiving exported PNGs
    pub out_dir: String,
    /// Width of a single-column panel before scaling, in pixels
    pub panel_width: u32,
    /// Space between panels before scaling, in pixels
    pub gutter: u32,
    /// Output scale factor
    pub scale: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            out_dir: ".".to_string(),
            panel_width: 240,
            gutter: 8,
            scale: 2,
        }
    }
}

/// Top-level Omni configuration.
///
/// # Example
///
/// ```no_run
/// use omni_models::OmniConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = OmniConfig::load()?;
/// println!("model: {}", config.gemini.model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct OmniConfig {
    /// Model provider settings
    #[serde(default)]
    pub gemini: GeminiSettings,
    /// Image intake settings
    #[serde(default)]
    pub intake: IntakeSettings,
    /// Story generation settings
    #[serde(default)]
    pub story: StorySettings,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// PNG export settings
    #[serde(default)]
    pub export: ExportSettings,
}

impl OmniConfig {
    /// Load configuration from a specific file path layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> OmniResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                OmniError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                OmniError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> OmniResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/omni/omni.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("omni").required(false));

        builder
            .build()
            .map_err(|e| {
                OmniError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                OmniError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}

const DEFAULT_CONFIG: &str = include_str!("../../../omni.toml");

/// Everything the Gemini driver needs, credential included.
#[derive(Clone, PartialEq, derive_getters::Getters)]
pub struct GeminiConfig {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    json_mode: bool,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiConfig {
    /// Build from settings and the process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when neither `GOOGLE_GEMINI_API_KEY` nor
    /// `GEMINI_API_KEY` holds a non-empty value.
    pub fn from_env(settings: &GeminiSettings) -> OmniResult<Self> {
        Self::from_lookup(settings, |name| std::env::var(name).ok())
    }

    /// Build from settings, resolving the API key through `lookup`.
    ///
    /// # Examples
    ///
    /// ```
    /// use omni_models::{GeminiConfig, GeminiSettings};
    ///
    /// let settings = GeminiSettings::default();
    /// assert!(GeminiConfig::from_lookup(&settings, |_| None).is_err());
    ///
    /// let config = GeminiConfig::from_lookup(&settings, |name| {
    ///     (name == "GEMINI_API_KEY").then(|| "secret".to_string())
    /// })
    /// .unwrap();
    /// assert_eq!(config.api_key(), "secret");
    /// ```
    pub fn from_lookup<F>(settings: &GeminiSettings, lookup: F) -> OmniResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = [API_KEY_VAR, FALLBACK_API_KEY_VAR]
            .into_iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or_else(|| {
                OmniError::from(ConfigError::new(format!(
                    "{} is not configured. Add it to your .env file.",
                    API_KEY_VAR
                )))
            })?;

        Ok(Self::with_api_key(settings, api_key))
    }

    /// Build from settings with an explicit API key.
    pub fn with_api_key(settings: &GeminiSettings, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(settings.timeout_secs),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
            json_mode: settings.json_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_parse() {
        let config: OmniConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.intake.max_images, 10);
        assert_eq!(config.story.min_images, 2);
        assert_eq!(config.story.validation, ValidationPolicy::DiscardInvalid);
        assert_eq!(config.export.scale, 2);
    }

    #[test]
    fn primary_key_wins_over_fallback() {
        let settings = GeminiSettings::default();
        let config = GeminiConfig::from_lookup(&settings, |name| match name {
            API_KEY_VAR => Some("primary".to_string()),
            FALLBACK_API_KEY_VAR => Some("fallback".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_key(), "primary");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let settings = GeminiSettings::default();
        let err = GeminiConfig::from_lookup(&settings, |_| Some("   ".to_string())).unwrap_err();
        assert_eq!(err.category(), "configuration");
        assert!(err.user_message().contains("GOOGLE_GEMINI_API_KEY"));
    }

    #[test]
    fn debug_output_hides_key() {
        let config = GeminiConfig::with_api_key(&GeminiSettings::default(), "top-secret");
        assert!(!format!("{:?}", config).contains("top-secret"));
    }

    #[test]
    fn trailing_slash_trimmed_from_base_url() {
        let settings = GeminiSettings {
            base_url: "http://localhost:9999/v1beta/".to_string(),
            ..GeminiSettings::default()
        };
        let config = GeminiConfig::with_api_key(&settings, "k");
        assert_eq!(config.base_url(), "http://localhost:9999/v1beta");
    }
}
