//! Request and response types for model generation.

use crate::{Input, Output};
use serde::{Deserialize, Serialize};

/// Single-turn multimodal generation request.
///
/// Parts are sent in order; story requests put every image first and the
/// prompt text last.
///
/// # Examples
///
/// ```
/// use omni_core::{GenerateRequest, Input};
///
/// let request = GenerateRequest::builder()
///     .inputs(vec![Input::Text("Hello!".to_string())])
///     .model("gemini-2.0-flash")
///     .temperature(0.7)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.inputs().len(), 1);
/// assert_eq!(request.model().as_deref(), Some("gemini-2.0-flash"));
/// assert_eq!(*request.max_tokens(), None);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(default)]
pub struct GenerateRequest {
    /// Ordered request parts
    #[builder(setter(into))]
    inputs: Vec<Input>,
    /// Model identifier override
    #[builder(setter(into, strip_option))]
    model: Option<String>,
    /// Sampling temperature
    #[builder(setter(strip_option))]
    temperature: Option<f32>,
    /// Maximum number of output tokens
    #[builder(setter(strip_option))]
    max_tokens: Option<u32>,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Request consisting of the given parts with provider defaults.
    pub fn new(inputs: Vec<Input>) -> Self {
        Self {
            inputs,
            ..Default::default()
        }
    }

    /// Number of image parts.
    pub fn image_count(&self) -> usize {
        self.inputs.iter().filter(|input| input.is_image()).count()
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use omni_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("[".to_string()), Output::Text("]".to_string())],
/// };
///
/// assert_eq!(response.text(), "[]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenation of every text output, in order.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .filter_map(|output| match output {
                Output::Text(text) => Some(text.as_str()),
                Output::Json(_) => None,
            })
            .collect()
    }
}
