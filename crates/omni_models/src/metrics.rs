//! Metrics for model API calls.
//!
//! Provides OpenTelemetry-based metrics for tracking model latency, failures
//! and token usage. Without an installed meter provider the instruments are
//! no-ops.

use omni_error::{OmniError, OmniErrorKind, ServiceErrorKind};
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;

static METRICS: OnceLock<LlmMetrics> = OnceLock::new();

/// Metrics for model API interactions.
///
/// Labeled with provider and model name.
#[derive(Clone)]
pub struct LlmMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Total model API requests
    pub requests: Counter<u64>,
    /// Failed model API requests
    pub errors: Counter<u64>,
    /// Model API call duration in seconds
    pub duration: Histogram<f64>,
    /// Total tokens used (prompt + completion)
    pub tokens_used: Counter<u64>,
    /// Prompt tokens used
    pub prompt_tokens: Counter<u64>,
    /// Completion tokens used
    pub completion_tokens: Counter<u64>,
}

impl LlmMetrics {
    fn init() -> Self {
        let meter = global::meter("omni_llm");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("llm.requests")
                .with_description("Total model API requests")
                .build(),
            errors: meter
                .u64_counter("llm.errors")
                .with_description("Failed model API requests")
                .build(),
            duration: meter
                .f64_histogram("llm.duration")
                .with_unit("seconds")
                .with_description("Model API call duration")
                .build(),
            tokens_used: meter
                .u64_counter("llm.tokens")
                .with_description("Total tokens used (prompt + completion)")
                .build(),
            prompt_tokens: meter
                .u64_counter("llm.tokens.prompt")
                .with_description("Prompt tokens used")
                .build(),
            completion_tokens: meter
                .u64_counter("llm.tokens.completion")
                .with_description("Completion tokens used")
                .build(),
        }
    }

    /// Get the global metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a successful request.
    pub fn record_request(&self, provider: &str, model: &str, duration_secs: f64) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a failed request.
    pub fn record_error(&self, provider: &str, model: &str, error_type: &str) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
            KeyValue::new("error_type", error_type.to_string()),
        ];
        self.errors.add(1, labels);
    }

    /// Record token usage reported by the provider.
    pub fn record_tokens(
        &self,
        model: &str,
        prompt_tokens: u64,
        completion_tokens: u64,
        total_tokens: u64,
    ) {
        let labels = &[KeyValue::new("model", model.to_string())];
        self.tokens_used.add(total_tokens, labels);
        self.prompt_tokens.add(prompt_tokens, labels);
        self.completion_tokens.add(completion_tokens, labels);
    }
}

impl Default for LlmMetrics {
    fn default() -> Self {
        Self::get().clone()
    }
}

/// Classify an error for metrics labeling.
///
/// Returns one of: "rate_limit", "auth", "network", "timeout",
/// "invalid_request", "server", "decode", "empty", or the error category.
///
/// # Examples
///
/// ```
/// use omni_error::{OmniError, ServiceError, ServiceErrorKind};
/// use omni_models::classify_error;
///
/// let err: OmniError = ServiceError::new(ServiceErrorKind::Http {
///     status_code: 429,
///     message: "quota".to_string(),
/// })
/// .into();
/// assert_eq!(classify_error(&err), "rate_limit");
/// ```
pub fn classify_error(error: &OmniError) -> &'static str {
    let OmniErrorKind::Service(service) = error.kind() else {
        return error.category();
    };

    match &service.kind {
        ServiceErrorKind::Http { status_code, .. } => match status_code {
            429 => "rate_limit",
            401 | 403 => "auth",
            408 | 504 => "timeout",
            400..=499 => "invalid_request",
            _ => "server",
        },
        ServiceErrorKind::Request(message) if message.to_lowercase().contains("timed out") => {
            "timeout"
        }
        ServiceErrorKind::Request(_) | ServiceErrorKind::ClientCreation(_) => "network",
        ServiceErrorKind::Decode(_) => "decode",
        ServiceErrorKind::EmptyResponse => "empty",
    }
}
