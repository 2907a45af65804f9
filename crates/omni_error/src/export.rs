//! Export (rasterization) errors.

/// Export failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ExportErrorKind {
    /// Image payload was not valid base64
    #[display("Image {} is not valid base64: {}", index, reason)]
    Base64 {
        /// Image index
        index: usize,
        /// Decoder message
        reason: String,
    },
    /// Image bytes could not be decoded
    #[display("Image {} could not be decoded: {}", index, reason)]
    Decode {
        /// Image index
        index: usize,
        /// Decoder message
        reason: String,
    },
    /// Story has no frames with a matching image
    #[display("Nothing to render")]
    Empty,
    /// Writing the output file failed
    #[display("Failed to write {}: {}", path, reason)]
    Write {
        /// Destination path
        path: String,
        /// Underlying error message
        reason: String,
    },
}

/// Export error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Export Error: {} at line {} in {}", kind, line, file)]
pub struct ExportError {
    kind: ExportErrorKind,
    line: u32,
    file: &'static str,
}

impl ExportError {
    /// Create a new export error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ExportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ExportErrorKind {
        &self.kind
    }
}
