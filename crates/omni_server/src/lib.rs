//! HTTP boundary for the Omni story generator.
//!
//! Routes:
//! - `POST /api/generate-story`: images + context + story type in, `{"stories": [...]}` out
//! - `GET /health`: liveness
//!
//! Every failure body is `{"error": "<message>"}` with status 400 for input
//! validation and 500 for everything else.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod server;
mod state;

pub use api::{
    ApiError, DEFAULT_CONTEXT, DEFAULT_STORY_TYPE, GenerateStoryBody, GenerateStoryResponse,
    MAX_BODY_BYTES, create_router, generate_story, health_check,
};
pub use server::{serve, shutdown_signal};
pub use state::{AppState, SharedGenerator};
