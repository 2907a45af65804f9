//! Mock story driver for testing.

use async_trait::async_trait;
use omni_core::{GenerateRequest, GenerateResponse, Output};
use omni_error::{OmniResult, ServiceError, ServiceErrorKind};
use omni_interface::StoryDriver;
use std::sync::{Arc, Mutex};

/// A single mock response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(ServiceErrorKind),
}

/// Mock driver that replays scripted responses and records requests.
///
/// The last response repeats once the script is exhausted.
#[derive(Debug, Clone)]
pub struct MockDriver {
    responses: Vec<MockResponse>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockDriver {
    /// Always succeed with the given text.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_sequence(vec![MockResponse::Success(text.into())])
    }

    /// Always fail with the given error.
    #[allow(dead_code)]
    pub fn new_error(kind: ServiceErrorKind) -> Self {
        Self::new_sequence(vec![MockResponse::Error(kind)])
    }

    /// Replay responses in order.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            responses,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests seen so far.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> OmniResult<GenerateResponse> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(req.clone());
            requests.len() - 1
        };

        let response = self
            .responses
            .get(call)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or(MockResponse::Error(ServiceErrorKind::EmptyResponse));

        match response {
            MockResponse::Success(text) => Ok(GenerateResponse {
                outputs: vec![Output::Text(text)],
            }),
            MockResponse::Error(kind) => Err(ServiceError::new(kind).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// JSON for `count` suggestions over `frames` images, each a rotation of the
/// image order.
#[allow(dead_code)]
pub fn story_json(count: usize, frames: usize) -> String {
    let stories: Vec<serde_json::Value> = (0..count)
        .map(|s| {
            let frame_list: Vec<serde_json::Value> = (0..frames)
                .map(|f| {
                    serde_json::json!({
                        "imageIndex": (f + s) % frames,
                        "caption": format!("Caption {f}"),
                        "narrativeText": format!("Frame {f} of story {s}."),
                    })
                })
                .collect();
            let theme = ["adventure", "discovery", "celebration"][s % 3];
            serde_json::json!({
                "title": format!("Story {s}"),
                "theme": theme,
                "frames": frame_list,
                "hookText": "Wait for it",
                "closingText": "Follow for more",
            })
        })
        .collect();
    serde_json::Value::Array(stories).to_string()
}
