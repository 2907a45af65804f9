//! Story request construction and prompt rendering.

use omni_core::{
    GenerateRequest, ImagePayload, Input, MAX_IMAGES, MediaSource, SUGGESTION_COUNT, StoryType,
    UploadedImage,
};
use omni_error::{OmniResult, ValidationError, ValidationErrorKind};
use tracing::{debug, instrument};

/// Everything one generation call needs: ordered images, context and type.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StoryRequest {
    /// Ordered image payloads
    images: Vec<ImagePayload>,
    /// Free-text context, never empty
    context: String,
    /// Narrative style
    story_type: StoryType,
}

impl StoryRequest {
    /// Build from wire payloads.
    ///
    /// # Errors
    ///
    /// Returns a validation error for zero images or more than
    /// [`MAX_IMAGES`](omni_core::MAX_IMAGES).
    ///
    /// # Examples
    ///
    /// ```
    /// use omni_core::{ImagePayload, StoryType};
    /// use omni_story::StoryRequest;
    ///
    /// let request = StoryRequest::from_payloads(
    ///     vec![ImagePayload::new("AAAA", "image/png")],
    ///     "  ",
    ///     StoryType::Event,
    /// )
    /// .unwrap();
    /// assert_eq!(request.context(), "Create an engaging event story for social media");
    /// ```
    pub fn from_payloads(
        images: Vec<ImagePayload>,
        context: &str,
        story_type: StoryType,
    ) -> OmniResult<Self> {
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

        let context = match context.trim() {
            "" => default_context(story_type),
            _ => context.to_string(),
        };

        Ok(Self {
            images,
            context,
            story_type,
        })
    }

    /// Number of images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Model request: every image in order, then the prompt text.
    pub fn to_generate_request(&self) -> GenerateRequest {
        let mut inputs: Vec<Input> = self
            .images
            .iter()
            .map(|image| Input::Image {
                mime: image.mime_type.clone(),
                source: MediaSource::Base64(image.base64.clone()),
            })
            .collect();
        inputs.push(Input::Text(build_prompt(self)));
        GenerateRequest::new(inputs)
    }
}

/// Context used when the caller supplies none.
pub fn default_context(story_type: StoryType) -> String {
    format!("Create an engaging {} story for social media", story_type)
}

/// Build a story request from the working set.
///
/// # Errors
///
/// Returns a validation error for zero images or more than ten.
#[instrument(skip(images, context), fields(images = images.len(), story_type = %story_type))]
pub fn build_request(
    images: &[UploadedImage],
    context: &str,
    story_type: StoryType,
) -> OmniResult<StoryRequest> {
    let payloads = images.iter().map(UploadedImage::payload).collect();
    let request = StoryRequest::from_payloads(payloads, context, story_type)?;
    debug!(context = %request.context, "Built story request");
    Ok(request)
}

/// Render the instruction text sent after the images.
pub fn build_prompt(request: &StoryRequest) -> String {
    let count = request.image_count();
    format!(
        r#"You are a creative social media storytelling expert. Analyze these {count} images and create compelling story suggestions for a social media story (like Instagram Stories).

Context: {context}
Story type: {story_type}

IMPORTANT RULES:
- Each image must tell a part of the story, like panels in a comic book
- The story should flow naturally from one image to the next
- Captions should be short, punchy, and engaging (max 10 words per caption)
- The narrative should hook viewers from the first frame
- Use the actual content visible in the images to craft authentic stories

Generate exactly {suggestions} different story suggestions. Each suggestion should use ALL {count} images in a deliberate order that creates the best narrative flow. You can reorder the images if needed.

Respond in this exact JSON format (no markdown, no code blocks, just raw JSON):
[
  {{
    "title": "Story title (short, catchy)",
    "theme": "One word theme like: adventure, discovery, transformation, celebration",
    "frames": [
      {{
        "imageIndex": 0,
        "caption": "Short punchy caption for this frame",
        "narrativeText": "Slightly longer description of what this frame conveys in the story (1-2 sentences)"
      }}
    ],
    "hookText": "Opening hook text to grab attention",
    "closingText": "Closing CTA or memorable ending line"
  }}
]

Each story must have exactly {count} frames (one per image). imageIndex refers to the 0-based index of the input images."#,
        count = count,
        context = request.context,
        story_type = request.story_type,
        suggestions = SUGGESTION_COUNT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(n: usize) -> Vec<ImagePayload> {
        (0..n)
            .map(|i| ImagePayload::new(format!("img{i}"), "image/jpeg"))
            .collect()
    }

    #[test]
    fn bounds_are_enforced() {
        let err = StoryRequest::from_payloads(payloads(0), "c", StoryType::Trip).unwrap_err();
        assert_eq!(err.user_message(), "At least one image is required");
        assert_eq!(err.status(), 400);

        let err = StoryRequest::from_payloads(payloads(11), "c", StoryType::Trip).unwrap_err();
        assert_eq!(err.user_message(), "Maximum 10 images allowed");

        for n in 1..=10 {
            assert!(StoryRequest::from_payloads(payloads(n), "c", StoryType::Trip).is_ok());
        }
    }

    #[test]
    fn explicit_context_is_kept_verbatim() {
        let request =
            StoryRequest::from_payloads(payloads(1), "Our trip to Lisbon", StoryType::Trip)
                .unwrap();
        assert_eq!(request.context(), "Our trip to Lisbon");
    }

    #[test]
    fn prompt_states_counts_and_contract() {
        let request =
            StoryRequest::from_payloads(payloads(4), "Launch day", StoryType::Product).unwrap();
        let prompt = build_prompt(&request);

        assert!(prompt.contains("Analyze these 4 images"));
        assert!(prompt.contains("Generate exactly 3 different story suggestions"));
        assert!(prompt.contains("Each story must have exactly 4 frames"));
        assert!(prompt.contains("Context: Launch day"));
        assert!(prompt.contains("Story type: product"));
        assert!(prompt.contains("0-based index"));
        assert!(prompt.contains("max 10 words per caption"));
        assert!(prompt.contains("\"narrativeText\""));
    }

    #[test]
    fn prompt_is_deterministic() {
        let request = StoryRequest::from_payloads(payloads(2), "x", StoryType::Event).unwrap();
        assert_eq!(build_prompt(&request), build_prompt(&request));
    }

    #[test]
    fn generate_request_puts_images_first() {
        let request = StoryRequest::from_payloads(payloads(3), "x", StoryType::Trip).unwrap();
        let generate = request.to_generate_request();
        let inputs = generate.inputs();

        assert_eq!(inputs.len(), 4);
        assert!(inputs[..3].iter().all(Input::is_image));
        assert!(inputs[3].as_text().is_some_and(|t| t.contains("3 images")));
        match &inputs[1] {
            Input::Image { source, .. } => {
                assert_eq!(source, &MediaSource::Base64("img1".to_string()))
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }
}
