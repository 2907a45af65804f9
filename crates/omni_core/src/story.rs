//! Story records produced by the model.

use serde::{Deserialize, Serialize};

/// Narrative style requested by the user.
///
/// # Examples
///
/// ```
/// use omni_core::StoryType;
/// use std::str::FromStr;
///
/// assert_eq!(StoryType::from_str("Trip").unwrap(), StoryType::Trip);
/// assert_eq!(StoryType::Commercial.to_string(), "commercial");
/// assert_eq!(StoryType::Product.label(), "Product Showcase");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoryType {
    /// Travel / trip story
    #[default]
    Trip,
    /// Commercial or advertisement
    Commercial,
    /// Product showcase
    Product,
    /// Event coverage
    Event,
    /// Lifestyle / personal
    Lifestyle,
}

impl StoryType {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StoryType::Trip => "Travel / Trip",
            StoryType::Commercial => "Commercial / Ad",
            StoryType::Product => "Product Showcase",
            StoryType::Event => "Event Coverage",
            StoryType::Lifestyle => "Lifestyle / Personal",
        }
    }

    /// Icon tag for presentation layers.
    pub fn icon(&self) -> &'static str {
        match self {
            StoryType::Trip => "plane",
            StoryType::Commercial => "megaphone",
            StoryType::Product => "package",
            StoryType::Event => "calendar",
            StoryType::Lifestyle => "heart",
        }
    }
}

/// One panel of a story: which image, plus its caption and narrative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryFrame {
    /// 0-based index into the originating image list
    pub image_index: usize,
    /// Short caption (guidance: at most 10 words)
    pub caption: String,
    /// Longer narrative (guidance: 1-2 sentences)
    pub narrative_text: String,
}

/// One complete generated story variant.
///
/// # Examples
///
/// ```
/// use omni_core::StorySuggestion;
///
/// let json = r#"{
///     "title": "T",
///     "theme": "adventure",
///     "frames": [{"imageIndex": 0, "caption": "c", "narrativeText": "n"}],
///     "hookText": "h",
///     "closingText": "e"
/// }"#;
/// let story: StorySuggestion = serde_json::from_str(json).unwrap();
/// assert_eq!(story.frames[0].image_index, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySuggestion {
    /// Short, catchy title
    pub title: String,
    /// One-word theme (adventure, discovery, ...)
    pub theme: String,
    /// Ordered frames, one per input image
    pub frames: Vec<StoryFrame>,
    /// Opening hook line
    pub hook_text: String,
    /// Closing line or call to action
    pub closing_text: String,
}

impl StorySuggestion {
    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// What to do with parsed suggestions that break the frame contract.
///
/// A suggestion is valid when it has one frame per input image and its
/// `image_index` values form a permutation of `0..image_count`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ValidationPolicy {
    /// Accept whatever the model returned
    Trust,
    /// Drop invalid suggestions, fail only if none remain
    #[default]
    DiscardInvalid,
    /// Fail on the first invalid suggestion
    Strict,
}
