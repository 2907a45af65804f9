//! Omni - AI comic-book story generator
//!
//! Omni turns an ordered set of photos into story suggestions: each suggestion
//! is a titled, themed sequence of frames, one per photo, with a caption and a
//! short narrative. Suggestions come from a multimodal model (Gemini) and are
//! laid out as a comic-style grid that can be exported as a PNG.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use omni::{GeminiClient, GeminiConfig, OmniConfig, RawFile, StoryGenerator, StoryType};
//! use omni::{PreviewRegistry, accept_files};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OmniConfig::load()?;
//!     let client = GeminiClient::new(GeminiConfig::from_env(&config.gemini)?)?;
//!     let generator = StoryGenerator::with_policy(client, config.story.validation);
//!
//!     let registry = PreviewRegistry::new();
//!     let files = vec![RawFile::from_path("a.jpg")?, RawFile::from_path("b.jpg")?];
//!     let images = accept_files(&registry, Vec::new(), files, config.intake.max_images);
//!
//!     for story in generator.generate(&images, "", StoryType::Trip).await? {
//!         println!("{}", story.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `omni_error` - Error types
//! - `omni_core` - Core data types (images, stories, requests)
//! - `omni_interface` - `StoryDriver` and `Vision` traits
//! - `omni_models` - Configuration and the Gemini driver
//! - `omni_story` - Intake, prompt building, parsing, layout, export, session
//! - `omni_server` - HTTP boundary
//!
//! This crate (`omni`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telemetry;

pub use telemetry::init_tracing;

pub use omni_error::{
    ConfigError, ExportError, ExportErrorKind, IntakeError, MalformedResponseError,
    MalformedResponseErrorKind, OmniError, OmniErrorKind, OmniResult, ServerError,
    ServerErrorKind, ServiceError, ServiceErrorKind, ValidationError, ValidationErrorKind,
};

pub use omni_core::{
    DisplayHandle, GenerateRequest, GenerateResponse, ImageId, ImagePayload, Input, MAX_IMAGES,
    MediaSource, Output, SUGGESTION_COUNT, StoryFrame, StorySuggestion, StoryType, UploadedImage,
    ValidationPolicy,
};

pub use omni_interface::{StoryDriver, Vision};

pub use omni_models::{
    ExportSettings, GeminiClient, GeminiConfig, GeminiSettings, IntakeSettings, LlmMetrics,
    OmniConfig, ServerSettings, StorySettings, classify_error,
};

pub use omni_story::{
    ComicRenderer, LayoutPlan, Placement, PreviewRegistry, RawFile, RenderOptions, Session, Span,
    Step, StoryGenerator, StoryRequest, Theme, ThemePalette, accept_files, build_prompt,
    build_request, default_context, describe_mood, export_filename, grid_columns, mime_for_path,
    parse, parse_validated, release_all, remove, reorder, span_override, strip_data_uri,
    strip_fences, validate,
};

pub use omni_server::{AppState, create_router, serve};
