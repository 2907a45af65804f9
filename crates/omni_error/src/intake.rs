//! Image intake errors.

/// Intake error wrapping file system failures with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Intake Error: {} at line {} in {}", message, line, file)]
pub struct IntakeError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl IntakeError {
    /// Create a new IntakeError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use omni_error::IntakeError;
    ///
    /// let err = IntakeError::new("Failed to read beach.jpg: No such file");
    /// assert!(err.message.contains("beach.jpg"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
