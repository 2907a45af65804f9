//! Driver that returns canned text and counts calls.

use async_trait::async_trait;
use omni_core::{GenerateRequest, GenerateResponse, Output};
use omni_error::OmniResult;
use omni_interface::StoryDriver;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock driver returning the same text on every call.
#[derive(Debug, Default)]
pub struct CountingDriver {
    text: String,
    calls: AtomicUsize,
}

impl CountingDriver {
    /// Driver answering with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate() calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoryDriver for CountingDriver {
    async fn generate(&self, _req: &GenerateRequest) -> OmniResult<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GenerateResponse {
            outputs: vec![Output::Text(self.text.clone())],
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Three valid suggestions over `frames` images.
pub fn stories_json(frames: usize) -> String {
    let frames: Vec<serde_json::Value> = (0..frames)
        .map(|i| serde_json::json!({"imageIndex": i, "caption": "c", "narrativeText": "n"}))
        .collect();
    let story = |title: &str| {
        serde_json::json!({
            "title": title,
            "theme": "discovery",
            "frames": frames,
            "hookText": "h",
            "closingText": "e"
        })
    };
    serde_json::json!([story("A"), story("B"), story("C")]).to_string()
}
