//! Trait definitions for model backends and their capabilities.

use async_trait::async_trait;
use omni_core::{GenerateRequest, GenerateResponse};
use omni_error::OmniResult;
use std::sync::Arc;

/// Core trait that every model backend implements.
///
/// One call, one response: no streaming, no conversation state and no retry.
#[async_trait]
pub trait StoryDriver: Send + Sync {
    /// Generate model output given a multimodal request.
    async fn generate(&self, req: &GenerateRequest) -> OmniResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T> StoryDriver for Arc<T>
where
    T: StoryDriver + ?Sized,
{
    async fn generate(&self, req: &GenerateRequest) -> OmniResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T> StoryDriver for Box<T>
where
    T: StoryDriver + ?Sized,
{
    async fn generate(&self, req: &GenerateRequest) -> OmniResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Trait for models that support image inputs.
pub trait Vision: StoryDriver {
    /// Maximum number of images per request.
    fn max_images_per_request(&self) -> usize {
        1
    }

    /// Supported image formats (MIME types).
    fn supported_image_formats(&self) -> &[&'static str] {
        &["image/png", "image/jpeg", "image/webp", "image/gif"]
    }

    /// Maximum image size in bytes.
    fn max_image_size_bytes(&self) -> usize {
        5 * 1024 * 1024 // 5MB default
    }

    /// Whether a MIME type is accepted by this model.
    fn supports_format(&self, mime: &str) -> bool {
        self.supported_image_formats()
            .iter()
            .any(|format| format.eq_ignore_ascii_case(mime))
    }
}
