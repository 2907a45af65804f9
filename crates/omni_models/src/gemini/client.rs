use omni_core::{GenerateRequest, GenerateResponse};
use omni_error::{OmniError, OmniResult, ServiceError, ServiceErrorKind};
use omni_interface::{StoryDriver, Vision};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, error, instrument};

use super::conversion::{from_gemini_response, http_error, to_gemini_request};
use super::dto::{GeminiRequest, GeminiResponse};
use crate::{GeminiConfig, LlmMetrics, classify_error};

/// Client for the Gemini `generateContent` REST endpoint.
///
/// One POST per call. The transport timeout comes from [`GeminiConfig`];
/// failures are reported once and never retried.
///
/// # Example
///
/// ```no_run
/// use omni_models::{GeminiClient, GeminiConfig, OmniConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = OmniConfig::load()?;
/// let client = GeminiClient::new(GeminiConfig::from_env(&settings.gemini)?)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceErrorKind::ClientCreation`] if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> OmniResult<Self> {
        debug!(model = %config.model(), "Creating new Gemini client");
        let client = Client::builder()
            .timeout(*config.timeout())
            .build()
            .map_err(|e| ServiceError::new(ServiceErrorKind::ClientCreation(e.to_string())))?;
        Ok(Self { client, config })
    }

    /// Resolved configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url(), model)
    }

    /// Sends a request body to the Gemini API.
    #[instrument(skip(self, request), fields(model = %model))]
    pub async fn generate_gemini(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> OmniResult<GeminiResponse> {
        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.config.api_key())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Gemini API");
                ServiceError::new(ServiceErrorKind::Request(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Gemini API returned error");
            return Err(http_error(status.as_u16(), &body).into());
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Gemini response");
            ServiceError::new(ServiceErrorKind::Decode(e.to_string()))
        })?;

        debug!(
            candidates = gemini_response.candidates().len(),
            "Received response from Gemini"
        );
        Ok(gemini_response)
    }

    fn record_usage(&self, model: &str, response: &GeminiResponse) {
        if let Some(usage) = response.usage_metadata() {
            LlmMetrics::get().record_tokens(
                model,
                *usage.prompt_token_count(),
                *usage.candidates_token_count(),
                *usage.total_token_count(),
            );
        }
    }
}

#[async_trait::async_trait]
impl StoryDriver for GeminiClient {
    #[instrument(skip(self, req), fields(images = req.image_count()))]
    async fn generate(&self, req: &GenerateRequest) -> OmniResult<GenerateResponse> {
        let model = req
            .model()
            .clone()
            .unwrap_or_else(|| self.config.model().clone());
        let body = to_gemini_request(req, &self.config);
        let started = Instant::now();

        let result: Result<GenerateResponse, OmniError> = async {
            let response = self.generate_gemini(&model, &body).await?;
            self.record_usage(&model, &response);
            from_gemini_response(&response)
        }
        .await;

        match &result {
            Ok(_) => LlmMetrics::get().record_request(
                self.provider_name(),
                &model,
                started.elapsed().as_secs_f64(),
            ),
            Err(e) => {
                LlmMetrics::get().record_error(self.provider_name(), &model, classify_error(e))
            }
        }

        result
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}

impl Vision for GeminiClient {
    fn max_images_per_request(&self) -> usize {
        omni_core::MAX_IMAGES
    }

    fn supported_image_formats(&self) -> &[&'static str] {
        &[
            "image/png",
            "image/jpeg",
            "image/webp",
            "image/heic",
            "image/heif",
        ]
    }

    fn max_image_size_bytes(&self) -> usize {
        20 * 1024 * 1024 // 20MB inline request limit
    }
}
