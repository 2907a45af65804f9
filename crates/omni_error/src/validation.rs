//! Input validation errors.

/// Specific validation failures for inbound story requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// No images were supplied
    #[display("At least one image is required")]
    NoImages,
    /// More images than the hard upper bound
    #[display("Maximum {} images allowed", max)]
    TooManyImages {
        /// The configured maximum
        max: usize,
        /// How many were supplied
        actual: usize,
    },
    /// Fewer images than the session requires before generating
    #[display("Please upload at least {} images to create a story", _0)]
    NotEnoughImages(usize),
    /// Story type tag not recognised
    #[display("Unknown story type: {}", _0)]
    UnknownStoryType(String),
    /// Image payload is unusable (empty data, non-image MIME type)
    #[display("Invalid image at position {}: {}", index, reason)]
    InvalidImage {
        /// Position of the image in the request
        index: usize,
        /// Why it was rejected
        reason: String,
    },
}

/// Validation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    line: u32,
    file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with caller location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use omni_error::{ValidationError, ValidationErrorKind};
    ///
    /// let err = ValidationError::new(ValidationErrorKind::TooManyImages { max: 10, actual: 11 });
    /// assert_eq!(err.kind().to_string(), "Maximum 10 images allowed");
    /// ```
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}
