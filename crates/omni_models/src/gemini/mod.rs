//! Google Gemini REST client.
//!
//! [`GeminiClient`] sends a single-turn multimodal request to
//! `models/{model}:generateContent` and returns the first candidate's text.
//! Image parts are sent inline as base64 in request order.

mod client;
mod conversion;
mod dto;

pub use client::GeminiClient;
pub use conversion::{from_gemini_response, http_error, to_gemini_request};
pub use dto::{
    Candidate, Content, ErrorBody, ErrorEnvelope, GeminiRequest, GeminiResponse,
    GenerationConfig, InlineData, InlineDataPart, Part, PromptFeedback, TextPart, UsageMetadata,
};
