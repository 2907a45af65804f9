//! Short color/mood descriptions for caption styling.

use omni_core::{GenerateRequest, ImagePayload, Input, MediaSource};
use omni_error::OmniResult;
use omni_interface::StoryDriver;
use tracing::{debug, instrument};

/// Instruction sent with the image.
pub const MOOD_PROMPT: &str = "Describe the dominant colors and mood of this image in 3-4 words, like \"warm golden sunset\" or \"cool blue urban\". This will be used to style a caption overlay. Just respond with the description, nothing else.";

/// Ask the model for a 3-4 word color and mood description of one image.
///
/// # Errors
///
/// Propagates the driver's error unchanged.
#[instrument(skip(driver, image), fields(mime = %image.mime_type))]
pub async fn describe_mood<D>(driver: &D, image: &ImagePayload) -> OmniResult<String>
where
    D: StoryDriver + ?Sized,
{
    let request = GenerateRequest::new(vec![
        Input::Image {
            mime: image.mime_type.clone(),
            source: MediaSource::Base64(image.base64.clone()),
        },
        Input::Text(MOOD_PROMPT.to_string()),
    ]);

    let response = driver.generate(&request).await?;
    let mood = response.text().trim().to_string();
    debug!(mood = %mood, "Described mood");
    Ok(mood)
}
