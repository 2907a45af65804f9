//! Single-user session state.
//!
//! A [`Session`] is a value: every action consumes it and returns the next
//! state. The session owns its images and releases their preview handles when
//! they are removed or when the session is closed or dropped.

use crate::intake::{self, PreviewRegistry, RawFile};
use crate::prompt::{StoryRequest, build_request};
use omni_core::{ImageId, MAX_IMAGES, StorySuggestion, StoryType, UploadedImage};
use omni_error::{OmniResult, ValidationErrorKind};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Which screen the session is on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Step {
    /// Collecting images and options
    #[default]
    Upload,
    /// Showing generated stories
    Results,
}

/// Minimum images before generation is allowed.
pub const MIN_IMAGES: usize = 2;

/// Upload, generate and review state for one user.
#[derive(Debug)]
pub struct Session {
    registry: Arc<PreviewRegistry>,
    images: Vec<UploadedImage>,
    story_type: StoryType,
    context: String,
    stories: Vec<StorySuggestion>,
    error: Option<String>,
    step: Step,
    loading: bool,
    max_images: usize,
    min_images: usize,
}

impl Session {
    /// Empty session with default limits.
    pub fn new(registry: Arc<PreviewRegistry>) -> Self {
        Self::with_limits(registry, MAX_IMAGES, MIN_IMAGES)
    }

    /// Empty session with explicit image limits.
    pub fn with_limits(
        registry: Arc<PreviewRegistry>,
        max_images: usize,
        min_images: usize,
    ) -> Self {
        Self {
            registry,
            images: Vec::new(),
            story_type: StoryType::default(),
            context: String::new(),
            stories: Vec::new(),
            error: None,
            step: Step::Upload,
            loading: false,
            max_images,
            min_images,
        }
    }

    /// Images in the working set, in story order.
    pub fn images(&self) -> &[UploadedImage] {
        &self.images
    }

    /// Selected story type.
    pub fn story_type(&self) -> StoryType {
        self.story_type
    }

    /// Free-text context as typed.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Stories from the last successful generation.
    pub fn stories(&self) -> &[StorySuggestion] {
        &self.stories
    }

    /// Last user-facing error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Whether a generation is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Preview registry shared with the intake layer.
    pub fn registry(&self) -> &Arc<PreviewRegistry> {
        &self.registry
    }

    /// Add files, respecting the image limit.
    pub fn add_files(mut self, files: Vec<RawFile>) -> Self {
        let images = std::mem::take(&mut self.images);
        self.images = intake::accept_files(&self.registry, images, files, self.max_images);
        self
    }

    /// Remove one image and release its preview.
    pub fn remove_image(mut self, id: &ImageId) -> Self {
        let images = std::mem::take(&mut self.images);
        self.images = intake::remove(&self.registry, images, id);
        self
    }

    /// Move an image within the working set.
    pub fn move_image(mut self, from: usize, to: usize) -> Self {
        let images = std::mem::take(&mut self.images);
        self.images = intake::reorder(images, from, to);
        self
    }

    /// Select a story type.
    pub fn set_story_type(mut self, story_type: StoryType) -> Self {
        self.story_type = story_type;
        self
    }

    /// Replace the context text.
    pub fn set_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Start a generation.
    ///
    /// With fewer than the minimum number of images, records an error and
    /// yields no request. While a generation is in flight, yields no request
    /// and leaves the session untouched.
    #[instrument(skip(self), fields(images = self.images.len()))]
    pub fn begin_generation(mut self) -> (Self, Option<StoryRequest>) {
        if self.loading {
            debug!("Generation already in flight");
            return (self, None);
        }
        if self.images.len() < self.min_images {
            let message = ValidationErrorKind::NotEnoughImages(self.min_images).to_string();
            debug!(message = %message, "Refusing to generate");
            self.error = Some(message);
            return (self, None);
        }

        match build_request(&self.images, &self.context, self.story_type) {
            Ok(request) => {
                self.loading = true;
                self.error = None;
                (self, Some(request))
            }
            Err(e) => {
                warn!(error = %e, "Could not build story request");
                self.error = Some(e.user_message());
                (self, None)
            }
        }
    }

    /// Finish a generation with its outcome.
    pub fn complete_generation(mut self, outcome: OmniResult<Vec<StorySuggestion>>) -> Self {
        self.loading = false;
        match outcome {
            Ok(stories) => {
                self.stories = stories;
                self.step = Step::Results;
            }
            Err(e) => {
                warn!(category = e.category(), error = %e, "Generation failed");
                self.error = Some(e.user_message());
            }
        }
        self
    }

    /// Back to upload. Clears stories and error, keeps images.
    pub fn reset(mut self) -> Self {
        self.step = Step::Upload;
        self.stories.clear();
        self.error = None;
        self
    }

    /// End the session, releasing every preview. Returns how many were released.
    pub fn close(mut self) -> usize {
        let images = std::mem::take(&mut self.images);
        intake::release_all(&self.registry, images)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.images.is_empty() {
            let images = std::mem::take(&mut self.images);
            intake::release_all(&self.registry, images);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(n: usize) -> Vec<RawFile> {
        (0..n)
            .map(|i| RawFile::new(format!("{i}.png"), "image/png", vec![i as u8]))
            .collect()
    }

    #[test]
    fn second_generation_waits_for_the_first() {
        let registry = Arc::new(PreviewRegistry::new());
        let (session, first) = Session::new(registry).add_files(files(3)).begin_generation();
        assert!(first.is_some());
        assert!(session.is_loading());

        let (session, second) = session.begin_generation();
        assert!(second.is_none());
        assert!(session.is_loading());
        assert_eq!(session.error(), None);

        let session = session.complete_generation(Ok(Vec::new()));
        let (_, third) = session.reset().begin_generation();
        assert!(third.is_some());
    }

    #[test]
    fn one_image_is_not_enough() {
        let registry = Arc::new(PreviewRegistry::new());
        let (session, request) = Session::new(registry).add_files(files(1)).begin_generation();
        assert!(request.is_none());
        assert_eq!(
            session.error(),
            Some("Please upload at least 2 images to create a story")
        );
        assert!(!session.is_loading());
    }

    #[test]
    fn begin_clears_error_and_sets_loading() {
        let registry = Arc::new(PreviewRegistry::new());
        let (session, _) = Session::new(registry).add_files(files(1)).begin_generation();
        let (session, request) = session.add_files(files(1)).begin_generation();

        let request = request.unwrap();
        assert_eq!(request.image_count(), 2);
        assert_eq!(
            request.context(),
            "Create an engaging trip story for social media"
        );
        assert!(session.error().is_none());
        assert!(session.is_loading());
    }

    #[test]
    fn reset_keeps_images() {
        let registry = Arc::new(PreviewRegistry::new());
        let session = Session::new(registry)
            .add_files(files(3))
            .complete_generation(Ok(Vec::new()));
        assert_eq!(session.step(), Step::Results);

        let session = session.reset();
        assert_eq!(session.step(), Step::Upload);
        assert_eq!(session.images().len(), 3);
        assert!(session.stories().is_empty());
    }

    #[test]
    fn drop_releases_handles() {
        let registry = Arc::new(PreviewRegistry::new());
        {
            let _session = Session::new(Arc::clone(&registry)).add_files(files(4));
            assert_eq!(registry.live_count(), 4);
        }
        assert_eq!(registry.live_count(), 0);
    }
}
