//! Routes and handlers.

use crate::AppState;
use axum::{
    Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use omni_core::{ImagePayload, MAX_IMAGES, StorySuggestion, StoryType};
use omni_error::{OmniError, ValidationError, ValidationErrorKind};
use omni_story::{StoryRequest, strip_data_uri};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info, instrument};

/// Context used when a request omits one.
pub const DEFAULT_CONTEXT: &str = "Create an engaging social media story";

/// Story type used when a request omits one.
pub const DEFAULT_STORY_TYPE: StoryType = StoryType::Lifestyle;

/// Request body limit; ten inline photos easily exceed axum's 2 MB default.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// `POST /api/generate-story` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryBody {
    /// Ordered images
    #[serde(default)]
    pub images: Option<Vec<ImagePayload>>,
    /// Free-text context
    #[serde(default)]
    pub context: Option<String>,
    /// Story type tag
    #[serde(default)]
    pub story_type: Option<String>,
}

/// `POST /api/generate-story` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateStoryResponse {
    /// Generated stories
    pub stories: Vec<StorySuggestion>,
}

/// Handler error rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// User-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<OmniError> for ApiError {
    fn from(err: OmniError) -> Self {
        let status =
            StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(category = err.category(), error = %err, "Story generation error");
        }
        Self::new(status, err.user_message())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        OmniError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/generate-story", post(generate_story))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Generate stories for the posted images.
///
/// Image count and story type are checked before the credential and before
/// any model call.
#[instrument(skip_all)]
pub async fn generate_story(
    State(state): State<AppState>,
    body: Result<Json<GenerateStoryBody>, JsonRejection>,
) -> Result<Json<GenerateStoryResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let images = body.images.unwrap_or_default();
    if images.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::NoImages).into());
    }
    if images.len() > MAX_IMAGES {
        return Err(ValidationError::new(ValidationErrorKind::TooManyImages {
            max: MAX_IMAGES,
            actual: images.len(),
        })
        .into());
    }

    let story_type = match body.story_type.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_STORY_TYPE,
        Some(tag) => StoryType::from_str(tag).map_err(|_| {
            ValidationError::new(ValidationErrorKind::UnknownStoryType(tag.to_string()))
        })?,
    };

    let images = normalize_images(images)?;

    let generator = state.generator().map_err(OmniError::from)?;

    let context = body
        .context
        .filter(|context| !context.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONTEXT.to_string());

    info!(images = images.len(), story_type = %story_type, "Generating stories");
    let request = StoryRequest::from_payloads(images, &context, story_type)?;
    let stories = generator.generate_from_request(&request).await?;

    Ok(Json(GenerateStoryResponse { stories }))
}

/// Strip data-URI prefixes and reject payloads that cannot be images.
fn normalize_images(images: Vec<ImagePayload>) -> Result<Vec<ImagePayload>, ValidationError> {
    images
        .into_iter()
        .enumerate()
        .map(|(index, image)| {
            let data = strip_data_uri(image.base64.trim());
            if data.is_empty() {
                return Err(ValidationError::new(ValidationErrorKind::InvalidImage {
                    index,
                    reason: "empty image data".to_string(),
                }));
            }
            if !image.mime_type.to_ascii_lowercase().starts_with("image/") {
                return Err(ValidationError::new(ValidationErrorKind::InvalidImage {
                    index,
                    reason: format!("unsupported type {}", image.mime_type),
                }));
            }
            Ok(ImagePayload::new(data, image.mime_type.as_str()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_payloads_are_normalized() {
        let images = normalize_images(vec![ImagePayload::new(
            "data:image/png;base64,AAAA",
            "image/png",
        )])
        .unwrap();
        assert_eq!(images[0].base64, "AAAA");
    }

    #[test]
    fn non_image_payloads_are_rejected() {
        let err = normalize_images(vec![
            ImagePayload::new("AAAA", "image/png"),
            ImagePayload::new("AAAA", "application/pdf"),
        ])
        .unwrap_err();
        assert_eq!(
            err.kind(),
            &ValidationErrorKind::InvalidImage {
                index: 1,
                reason: "unsupported type application/pdf".to_string()
            }
        );
    }

    #[test]
    fn api_error_body_shape() {
        let err: ApiError = ValidationError::new(ValidationErrorKind::NoImages).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "At least one image is required");
    }
}
