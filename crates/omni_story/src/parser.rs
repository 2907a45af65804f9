//! Parsing and validating model output.
//!
//! Models often wrap JSON in a markdown fence despite being asked not to.
//! [`parse`] strips one fence and decodes the list; [`validate`] applies a
//! [`ValidationPolicy`] to the frame contract.

use omni_core::{StorySuggestion, ValidationPolicy};
use omni_error::{MalformedResponseError, MalformedResponseErrorKind, OmniResult};
use tracing::{debug, error, instrument, warn};

/// Strip a surrounding ```` ``` ```` fence, with or without a language tag.
///
/// # Examples
///
/// ```
/// use omni_story::strip_fences;
///
/// assert_eq!(strip_fences("```json\n[1]\n```"), "[1]");
/// assert_eq!(strip_fences("  [1]  "), "[1]");
/// ```
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let rest = &rest[tag_len..];
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim_end()
}

/// Decode raw model text into story suggestions.
///
/// Does not check frame counts or image indices; see [`validate`].
///
/// # Errors
///
/// Returns a malformed response error if the text is not a JSON list of
/// complete suggestions.
#[instrument(skip(raw), fields(raw_len = raw.len()))]
pub fn parse(raw: &str, expected_frame_count: usize) -> OmniResult<Vec<StorySuggestion>> {
    let json = strip_fences(raw);

    let suggestions: Vec<StorySuggestion> = serde_json::from_str(json).map_err(|e| {
        let preview = json.chars().take(100).collect::<String>();
        error!(error = %e, json_preview = %preview, "Story JSON parsing failed");
        MalformedResponseError::new(MalformedResponseErrorKind::Deserialize(e.to_string()))
    })?;

    debug!(count = suggestions.len(), "Parsed story suggestions");
    Ok(suggestions)
}

/// Check one suggestion against the frame contract.
///
/// Valid when it has `expected_frame_count` frames whose image indices form a
/// permutation of `0..expected_frame_count`.
pub fn check_suggestion(
    position: usize,
    suggestion: &StorySuggestion,
    expected_frame_count: usize,
) -> Result<(), MalformedResponseErrorKind> {
    if suggestion.frame_count() != expected_frame_count {
        return Err(MalformedResponseErrorKind::FrameCountMismatch {
            suggestion: position,
            expected: expected_frame_count,
            actual: suggestion.frame_count(),
        });
    }

    let mut seen = vec![false; expected_frame_count];
    for frame in &suggestion.frames {
        let index = frame.image_index;
        let slot = seen
            .get_mut(index)
            .ok_or(MalformedResponseErrorKind::IndexOutOfRange {
                suggestion: position,
                index,
                count: expected_frame_count,
            })?;
        if *slot {
            return Err(MalformedResponseErrorKind::DuplicateIndex {
                suggestion: position,
                index,
            });
        }
        *slot = true;
    }
    Ok(())
}

/// Apply a validation policy to parsed suggestions.
///
/// # Errors
///
/// Under [`ValidationPolicy::Strict`], the first invalid suggestion's reason.
/// Under [`ValidationPolicy::DiscardInvalid`], `NoUsableSuggestions` when
/// nothing survives.
#[instrument(skip(suggestions), fields(count = suggestions.len(), policy = %policy))]
pub fn validate(
    suggestions: Vec<StorySuggestion>,
    expected_frame_count: usize,
    policy: ValidationPolicy,
) -> OmniResult<Vec<StorySuggestion>> {
    match policy {
        ValidationPolicy::Trust => Ok(suggestions),
        ValidationPolicy::Strict => {
            for (position, suggestion) in suggestions.iter().enumerate() {
                check_suggestion(position, suggestion, expected_frame_count)
                    .map_err(MalformedResponseError::new)?;
            }
            Ok(suggestions)
        }
        ValidationPolicy::DiscardInvalid => {
            let kept: Vec<StorySuggestion> = suggestions
                .into_iter()
                .enumerate()
                .filter_map(|(position, suggestion)| {
                    match check_suggestion(position, &suggestion, expected_frame_count) {
                        Ok(()) => Some(suggestion),
                        Err(reason) => {
                            warn!(title = %suggestion.title, %reason, "Discarding suggestion");
                            None
                        }
                    }
                })
                .collect();

            if kept.is_empty() {
                return Err(MalformedResponseError::new(
                    MalformedResponseErrorKind::NoUsableSuggestions,
                )
                .into());
            }
            Ok(kept)
        }
    }
}

/// [`parse`] followed by [`validate`].
pub fn parse_validated(
    raw: &str,
    expected_frame_count: usize,
    policy: ValidationPolicy,
) -> OmniResult<Vec<StorySuggestion>> {
    validate(parse(raw, expected_frame_count)?, expected_frame_count, policy)
}
