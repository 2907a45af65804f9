//! Generative-model service errors.

/// Failure conditions of the external model call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ServiceErrorKind {
    /// Failed to create the HTTP client
    #[display("Failed to create model client: {}", _0)]
    ClientCreation(String),
    /// Request never produced a response (network, DNS, TLS, timeout)
    #[display("Model request failed: {}", _0)]
    Request(String),
    /// Provider answered with a non-success status
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Provider's message, or the raw body when none was given
        message: String,
    },
    /// Response body could not be decoded as the provider's envelope
    #[display("Unreadable model response: {}", _0)]
    Decode(String),
    /// Provider returned no text at all (blocked, empty candidates)
    #[display("Model returned no text output")]
    EmptyResponse,
}

/// Service error with source location tracking.
///
/// # Examples
///
/// ```
/// use omni_error::{ServiceError, ServiceErrorKind};
///
/// let err = ServiceError::new(ServiceErrorKind::Http {
///     status_code: 429,
///     message: "Resource has been exhausted".to_string(),
/// });
/// assert!(format!("{}", err).contains("429"));
/// assert_eq!(err.provider_message(), "Resource has been exhausted");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Service Error: {} at line {} in {}", kind, line, file)]
pub struct ServiceError {
    /// The kind of error that occurred
    pub kind: ServiceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ServiceError {
    /// Create a new ServiceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The provider's own message when one is available, else the kind's text.
    pub fn provider_message(&self) -> String {
        match &self.kind {
            ServiceErrorKind::Http { message, .. } => message.clone(),
            ServiceErrorKind::Request(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
