//! Uploaded images and their wire payloads.

use serde::{Deserialize, Serialize};

/// Process-local unique image identifier.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
pub struct ImageId(String);

impl ImageId {
    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Revocable local preview reference for an uploaded image.
///
/// Handles are issued and released by a preview registry; holding one does not
/// keep anything alive by itself.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub struct DisplayHandle(String);

impl DisplayHandle {
    /// Wrap an issued handle string.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Borrow the handle as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One image as it travels over the wire: base64 bytes plus MIME type.
///
/// # Examples
///
/// ```
/// use omni_core::ImagePayload;
///
/// let payload: ImagePayload =
///     serde_json::from_str(r#"{"base64":"AAAA","mimeType":"image/jpeg"}"#).unwrap();
/// assert_eq!(payload.mime_type, "image/jpeg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    /// Base64 payload without any data-URI prefix
    pub base64: String,
    /// MIME type, e.g. "image/png"
    pub mime_type: String,
}

impl ImagePayload {
    /// Create a payload from base64 data and a MIME type.
    pub fn new(base64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// An image accepted into the working set.
///
/// Owned exclusively by the session that accepted it. Not `Clone`: the display
/// handle must be released exactly once, by whoever removes the image.
#[derive(Debug, PartialEq, Eq, derive_getters::Getters)]
pub struct UploadedImage {
    /// Unique identifier
    id: ImageId,
    /// Original file name
    name: String,
    /// Base64 payload
    base64: String,
    /// MIME type
    mime_type: String,
    /// Local preview handle
    display: DisplayHandle,
}

impl UploadedImage {
    /// Assemble an uploaded image from its parts.
    pub fn new(
        id: ImageId,
        name: impl Into<String>,
        base64: impl Into<String>,
        mime_type: impl Into<String>,
        display: DisplayHandle,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            base64: base64.into(),
            mime_type: mime_type.into(),
            display,
        }
    }

    /// Wire payload for a model request.
    pub fn payload(&self) -> ImagePayload {
        ImagePayload::new(self.base64.clone(), self.mime_type.clone())
    }
}
