//! Driver answering every request with the same text.

use async_trait::async_trait;
use omni::{GenerateRequest, GenerateResponse, OmniResult, Output, StoryDriver, Vision};
use std::sync::Mutex;

/// Mock driver with a fixed reply that records image counts per request.
#[derive(Debug, Default)]
pub struct FixedDriver {
    reply: String,
    image_counts: Mutex<Vec<usize>>,
}

impl FixedDriver {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            image_counts: Mutex::new(Vec::new()),
        }
    }

    /// Image parts seen in each request, in call order.
    pub fn image_counts(&self) -> Vec<usize> {
        self.image_counts.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryDriver for FixedDriver {
    async fn generate(&self, req: &GenerateRequest) -> OmniResult<GenerateResponse> {
        self.image_counts.lock().unwrap().push(req.image_count());
        Ok(GenerateResponse {
            outputs: vec![Output::Text(self.reply.clone())],
        })
    }

    fn provider_name(&self) -> &'static str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed-model"
    }
}

impl Vision for FixedDriver {}
