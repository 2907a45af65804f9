//! Error types for the Omni story generator.
//!
//! This crate provides the error taxonomy shared by every Omni crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind (or a message) with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The five user-facing categories are validation, configuration, service,
//! malformed response and export failures. Intake and server errors cover the
//! local file system and the HTTP listener.
//!
//! # Examples
//!
//! ```
//! use omni_error::{OmniResult, ValidationError, ValidationErrorKind};
//!
//! fn check(count: usize) -> OmniResult<()> {
//!     if count == 0 {
//!         Err(ValidationError::new(ValidationErrorKind::NoImages))?
//!     }
//!     Ok(())
//! }
//!
//! let err = check(0).unwrap_err();
//! assert_eq!(err.status(), 400);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod export;
mod intake;
mod response;
mod server;
mod service;
mod validation;

pub use config::ConfigError;
pub use error::{OmniError, OmniErrorKind, OmniResult};
pub use export::{ExportError, ExportErrorKind};
pub use intake::IntakeError;
pub use response::{MalformedResponseError, MalformedResponseErrorKind};
pub use server::{ServerError, ServerErrorKind};
pub use service::{ServiceError, ServiceErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
