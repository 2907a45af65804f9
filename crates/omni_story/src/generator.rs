//! End-to-end story generation over a model driver.

use crate::parser::{parse, validate};
use crate::prompt::{StoryRequest, build_request};
use omni_core::{StorySuggestion, StoryType, UploadedImage, ValidationPolicy};
use omni_error::{OmniResult, ServiceError, ServiceErrorKind};
use omni_interface::StoryDriver;
use tracing::{debug, info, instrument};

/// Builds the request, calls the model once, and parses the answer.
///
/// # Example
///
/// ```no_run
/// # use omni_core::{StoryType, UploadedImage};
/// # use omni_interface::StoryDriver;
/// use omni_story::StoryGenerator;
///
/// # async fn run<D: StoryDriver>(driver: D, images: Vec<UploadedImage>) -> omni_error::OmniResult<()> {
/// let generator = StoryGenerator::new(driver);
/// let stories = generator.generate(&images, "", StoryType::Trip).await?;
/// println!("{} stories", stories.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StoryGenerator<D> {
    driver: D,
    policy: ValidationPolicy,
}

impl<D: StoryDriver> StoryGenerator<D> {
    /// Generator with the default validation policy.
    pub fn new(driver: D) -> Self {
        Self::with_policy(driver, ValidationPolicy::default())
    }

    /// Generator with an explicit validation policy.
    pub fn with_policy(driver: D, policy: ValidationPolicy) -> Self {
        Self { driver, policy }
    }

    /// The underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Validation policy applied to model output.
    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Generate stories for the working set.
    ///
    /// # Errors
    ///
    /// Validation errors for bad image counts, service errors from the model
    /// call, malformed response errors from parsing.
    pub async fn generate(
        &self,
        images: &[UploadedImage],
        context: &str,
        story_type: StoryType,
    ) -> OmniResult<Vec<StorySuggestion>> {
        let request = build_request(images, context, story_type)?;
        self.generate_from_request(&request).await
    }

    /// Generate stories for an already-built request.
    #[instrument(
        skip(self, request),
        fields(
            provider = self.driver.provider_name(),
            model = self.driver.model_name(),
            images = request.image_count(),
            story_type = %request.story_type(),
        )
    )]
    pub async fn generate_from_request(
        &self,
        request: &StoryRequest,
    ) -> OmniResult<Vec<StorySuggestion>> {
        let expected = request.image_count();
        let response = self.driver.generate(&request.to_generate_request()).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ServiceError::new(ServiceErrorKind::EmptyResponse).into());
        }
        debug!(response_len = text.len(), "Model responded");

        let suggestions = validate(parse(&text, expected)?, expected, self.policy)?;
        info!(count = suggestions.len(), "Generated stories");
        Ok(suggestions)
    }
}
