//! Story pipeline for Omni.
//!
//! Image intake → request building → model call → parsing → layout → export.
//!
//! # Example
//!
//! ```
//! use omni_core::StoryType;
//! use omni_story::{LayoutPlan, PreviewRegistry, RawFile, accept_files, build_prompt, build_request};
//!
//! let registry = PreviewRegistry::new();
//! let files = vec![
//!     RawFile::new("beach.png", "image/png", vec![1, 2, 3]),
//!     RawFile::new("notes.txt", "text/plain", b"skip me".to_vec()),
//!     RawFile::new("sunset.jpg", "image/jpeg", vec![4, 5, 6]),
//! ];
//! let images = accept_files(&registry, Vec::new(), files, 10);
//! assert_eq!(images.len(), 2);
//!
//! let request = build_request(&images, "", StoryType::Trip).unwrap();
//! assert!(build_prompt(&request).contains("exactly 2 frames"));
//!
//! let plan = LayoutPlan::for_frames(images.len());
//! assert_eq!(plan.column_count(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod export;
mod generator;
mod intake;
mod layout;
mod mood;
mod parser;
mod prompt;
mod session;
mod theme;

pub use export::{
    ComicRenderer, MAX_GUTTER, MAX_PANEL_WIDTH, MAX_SCALE, RenderOptions, export_filename,
};
pub use generator::StoryGenerator;
pub use intake::{
    PreviewRegistry, RawFile, UNKNOWN_MIME, accept_files, mime_for_path, release_all, remove,
    reorder, strip_data_uri,
};
pub use layout::{LayoutPlan, Placement, Span, grid_columns, span_override};
pub use mood::{MOOD_PROMPT, describe_mood};
pub use parser::{check_suggestion, parse, parse_validated, strip_fences, validate};
pub use prompt::{StoryRequest, build_prompt, build_request, default_context};
pub use session::{MIN_IMAGES, Session, Step};
pub use theme::{BACKDROP, Theme, ThemePalette};
