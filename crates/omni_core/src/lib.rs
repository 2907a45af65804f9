//! Core data types for the Omni story generator.
//!
//! This crate provides the data model shared by the story pipeline, the model
//! drivers and the HTTP boundary: uploaded images and their wire payloads,
//! story records, and the provider-neutral generation request/response.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod image;
mod input;
mod media;
mod output;
mod request;
mod story;

pub use image::{DisplayHandle, ImageId, ImagePayload, UploadedImage};
pub use input::Input;
pub use media::MediaSource;
pub use output::Output;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use story::{StoryFrame, StorySuggestion, StoryType, ValidationPolicy};

/// Hard upper bound on images per story.
pub const MAX_IMAGES: usize = 10;

/// Number of story variants requested per generation call.
pub const SUGGESTION_COUNT: usize = 3;
