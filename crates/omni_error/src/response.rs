//! Errors for model output that does not match the story contract.

/// Why a model response was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MalformedResponseErrorKind {
    /// Text did not deserialize into a list of suggestions
    #[display("Failed to parse story suggestions: {}", _0)]
    Deserialize(String),
    /// A suggestion has the wrong number of frames
    #[display("Suggestion {} has {} frames, expected {}", suggestion, actual, expected)]
    FrameCountMismatch {
        /// Position of the suggestion in the response
        suggestion: usize,
        /// Number of input images
        expected: usize,
        /// Number of frames returned
        actual: usize,
    },
    /// A frame points past the end of the image list
    #[display("Suggestion {} references image {} of {}", suggestion, index, count)]
    IndexOutOfRange {
        /// Position of the suggestion in the response
        suggestion: usize,
        /// Offending image index
        index: usize,
        /// Number of input images
        count: usize,
    },
    /// Two frames in one suggestion use the same image
    #[display("Suggestion {} uses image {} more than once", suggestion, index)]
    DuplicateIndex {
        /// Position of the suggestion in the response
        suggestion: usize,
        /// Repeated image index
        index: usize,
    },
    /// Every suggestion was discarded
    #[display("No usable story suggestions in model response")]
    NoUsableSuggestions,
}

/// Malformed response error with location tracking.
///
/// # Examples
///
/// ```
/// use omni_error::{MalformedResponseError, MalformedResponseErrorKind};
///
/// let err = MalformedResponseError::new(MalformedResponseErrorKind::NoUsableSuggestions);
/// assert!(format!("{}", err).contains("No usable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Malformed Response: {} at line {} in {}", kind, line, file)]
pub struct MalformedResponseError {
    kind: MalformedResponseErrorKind,
    line: u32,
    file: &'static str,
}

impl MalformedResponseError {
    /// Create a new malformed response error with caller location tracking.
    #[track_caller]
    pub fn new(kind: MalformedResponseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MalformedResponseErrorKind {
        &self.kind
    }
}
