//! Type conversions between Omni and Gemini types.

use base64::{Engine, engine::general_purpose::STANDARD};
use omni_core::{GenerateRequest, GenerateResponse, Input, MediaSource, Output};
use omni_error::{OmniResult, ServiceError, ServiceErrorKind};
use tracing::debug;

use super::dto::{Content, ErrorEnvelope, GeminiRequest, GeminiResponse, GenerationConfig, Part};
use crate::GeminiConfig;

/// Converts an Omni request to a Gemini request body.
///
/// Parts keep their order. Binary media is base64-encoded; request-level
/// temperature and token limits override the configured ones.
pub fn to_gemini_request(request: &GenerateRequest, config: &GeminiConfig) -> GeminiRequest {
    let parts = request
        .inputs()
        .iter()
        .map(|input| match input {
            Input::Text(text) => Part::text(text.clone()),
            Input::Image { mime, source } => {
                let data = match source {
                    MediaSource::Base64(data) => data.clone(),
                    MediaSource::Binary(bytes) => STANDARD.encode(bytes),
                };
                Part::inline(mime.clone(), data)
            }
        })
        .collect();

    let generation_config = GenerationConfig {
        temperature: (*request.temperature()).or(*config.temperature()),
        max_output_tokens: (*request.max_tokens()).or(*config.max_output_tokens()),
        response_mime_type: config
            .json_mode()
            .then(|| "application/json".to_string()),
    };

    debug!(
        parts = request.inputs().len(),
        images = request.image_count(),
        "Converted request"
    );

    GeminiRequest {
        contents: vec![Content::user(parts)],
        generation_config: (!generation_config.is_empty()).then_some(generation_config),
    }
}

/// Converts a Gemini response to an Omni response.
///
/// # Errors
///
/// Returns [`ServiceErrorKind::EmptyResponse`] when no candidate carries text.
pub fn from_gemini_response(response: &GeminiResponse) -> OmniResult<GenerateResponse> {
    if let Some(reason) = response
        .prompt_feedback()
        .as_ref()
        .and_then(|feedback| feedback.block_reason().clone())
    {
        debug!(reason = %reason, "Prompt blocked by provider");
        return Err(ServiceError::new(ServiceErrorKind::EmptyResponse).into());
    }

    let text = response
        .first_text()
        .ok_or_else(|| ServiceError::new(ServiceErrorKind::EmptyResponse))?;

    Ok(GenerateResponse {
        outputs: vec![Output::Text(text)],
    })
}

/// Error for a non-success status, preferring the provider's own message.
pub fn http_error(status_code: u16, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    ServiceError::new(ServiceErrorKind::Http {
        status_code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeminiSettings;
    use omni_error::OmniErrorKind;

    fn config(json_mode: bool) -> GeminiConfig {
        let settings = GeminiSettings {
            json_mode,
            ..GeminiSettings::default()
        };
        GeminiConfig::with_api_key(&settings, "test-key")
    }

    #[test]
    fn images_precede_prompt_in_wire_body() {
        let request = GenerateRequest::new(vec![
            Input::Image {
                mime: "image/jpeg".to_string(),
                source: MediaSource::Base64("AAAA".to_string()),
            },
            Input::Image {
                mime: "image/png".to_string(),
                source: MediaSource::Binary(vec![1, 2, 3]),
            },
            Input::Text("tell a story".to_string()),
        ]);

        let body = serde_json::to_value(to_gemini_request(&request, &config(false))).unwrap();
        let parts = &body["contents"][0]["parts"];

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
        assert_eq!(parts[2]["text"], "tell a story");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn json_mode_sets_response_mime_type() {
        let request = GenerateRequest::new(vec![Input::Text("x".to_string())]);
        let body = serde_json::to_value(to_gemini_request(&request, &config(true))).unwrap();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn response_text_concatenates_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"[{"},{"text":"}]"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        let converted = from_gemini_response(&response).unwrap();
        assert_eq!(converted.text(), "[{}]");
    }

    #[test]
    fn missing_candidates_is_empty_response() {
        let err = from_gemini_response(&GeminiResponse::default()).unwrap_err();
        match err.kind() {
            OmniErrorKind::Service(e) => assert_eq!(e.kind, ServiceErrorKind::EmptyResponse),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_envelope_message_is_surfaced() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = http_error(400, body);
        assert_eq!(
            err.provider_message(),
            "API key not valid. Please pass a valid API key."
        );
    }

    #[test]
    fn unparseable_error_body_is_kept_verbatim() {
        let err = http_error(502, "  Bad Gateway\n");
        assert_eq!(err.provider_message(), "Bad Gateway");
    }
}
