//! Input types for model requests.

use crate::MediaSource;
use serde::{Deserialize, Serialize};

/// Parts of a multimodal model request.
///
/// # Examples
///
/// ```
/// use omni_core::{Input, MediaSource};
///
/// let text = Input::Text("Describe these photos".to_string());
///
/// let image = Input::Image {
///     mime: "image/png".to_string(),
///     source: MediaSource::Base64("iVBORw0KGgo=".to_string()),
/// };
/// assert!(image.is_image());
/// assert!(!text.is_image());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),

    /// Image input (PNG, JPEG, WebP, GIF, etc.).
    Image {
        /// MIME type, e.g., "image/png" or "image/jpeg"
        mime: String,
        /// Media source (base64 or raw bytes)
        source: MediaSource,
    },
}

impl Input {
    /// True for image parts.
    pub fn is_image(&self) -> bool {
        matches!(self, Input::Image { .. })
    }

    /// Text content, if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Input::Text(text) => Some(text),
            _ => None,
        }
    }
}
