//! Top-level error wrapper types.

use crate::{
    ConfigError, ExportError, IntakeError, MalformedResponseError, ServerError, ServiceError,
    ValidationError,
};

/// Union of every Omni error category.
///
/// # Examples
///
/// ```
/// use omni_error::{OmniError, ConfigError};
///
/// let err: OmniError = ConfigError::new("missing key").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum OmniErrorKind {
    /// Input shape or count violation
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Missing credential or unreadable configuration
    #[from(ConfigError)]
    Config(ConfigError),
    /// External model call failed
    #[from(ServiceError)]
    Service(ServiceError),
    /// Model output did not match the story contract
    #[from(MalformedResponseError)]
    MalformedResponse(MalformedResponseError),
    /// Rasterization or file export failed
    #[from(ExportError)]
    Export(ExportError),
    /// Reading an input file failed
    #[from(IntakeError)]
    Intake(IntakeError),
    /// HTTP listener failure
    #[from(ServerError)]
    Server(ServerError),
}

/// Omni error with kind discrimination.
///
/// # Examples
///
/// ```
/// use omni_error::{OmniResult, ConfigError};
///
/// fn might_fail() -> OmniResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert_eq!(err.status(), 500);
/// assert_eq!(err.user_message(), "Missing field");
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Omni Error: {}", _0)]
pub struct OmniError(Box<OmniErrorKind>);

impl OmniError {
    /// Create a new error from a kind.
    pub fn new(kind: OmniErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &OmniErrorKind {
        &self.0
    }

    /// HTTP-equivalent status: 400 for validation failures, 500 otherwise.
    pub fn status(&self) -> u16 {
        match self.kind() {
            OmniErrorKind::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Short category tag used in logs and metrics.
    pub fn category(&self) -> &'static str {
        match self.kind() {
            OmniErrorKind::Validation(_) => "validation",
            OmniErrorKind::Config(_) => "configuration",
            OmniErrorKind::Service(_) => "service",
            OmniErrorKind::MalformedResponse(_) => "malformed_response",
            OmniErrorKind::Export(_) => "export",
            OmniErrorKind::Intake(_) => "intake",
            OmniErrorKind::Server(_) => "server",
        }
    }

    /// Message suitable for showing to an end user (no source locations).
    pub fn user_message(&self) -> String {
        match self.kind() {
            OmniErrorKind::Validation(e) => e.kind().to_string(),
            OmniErrorKind::Config(e) => e.message.clone(),
            OmniErrorKind::Service(e) => e.provider_message(),
            OmniErrorKind::MalformedResponse(e) => e.kind().to_string(),
            OmniErrorKind::Export(_) => "Export failed. Please try again.".to_string(),
            OmniErrorKind::Intake(e) => e.message.clone(),
            OmniErrorKind::Server(e) => e.kind.to_string(),
        }
    }
}

// Generic From implementation for any type that converts to OmniErrorKind
impl<T> From<T> for OmniError
where
    T: Into<OmniErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Omni operations.
pub type OmniResult<T> = std::result::Result<T, OmniError>;
