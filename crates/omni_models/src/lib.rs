//! Configuration and model drivers for Omni.
//!
//! This crate loads the layered `omni.toml` configuration and provides the
//! Gemini driver behind the [`omni_interface::StoryDriver`] trait.
//!
//! # Example
//!
//! ```no_run
//! use omni_core::{GenerateRequest, Input};
//! use omni_interface::StoryDriver;
//! use omni_models::{GeminiClient, GeminiConfig, OmniConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OmniConfig::load()?;
//! let client = GeminiClient::new(GeminiConfig::from_env(&config.gemini)?)?;
//! let request = GenerateRequest::new(vec![Input::Text("Hello".to_string())]);
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gemini;
mod metrics;

pub use config::{
    API_KEY_VAR, ExportSettings, FALLBACK_API_KEY_VAR, GeminiConfig, GeminiSettings,
    IntakeSettings, OmniConfig, ServerSettings, StorySettings,
};
pub use gemini::{
    Candidate, Content, ErrorBody, ErrorEnvelope, GeminiClient, GeminiRequest, GeminiResponse,
    GenerationConfig, InlineData, InlineDataPart, Part, PromptFeedback, TextPart, UsageMetadata,
    from_gemini_response, http_error, to_gemini_request,
};
pub use metrics::{LlmMetrics, classify_error};
