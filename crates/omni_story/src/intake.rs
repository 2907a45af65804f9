//! Image intake: raw files in, uploaded images out.
//!
//! Every accepted image gets a preview handle from a [`PreviewRegistry`].
//! Handles are released on every removal path and on session teardown, so
//! `live_count` returns to zero once the working set is gone.

use base64::{Engine, engine::general_purpose::STANDARD};
use omni_core::{DisplayHandle, ImageId, UploadedImage};
use omni_error::{IntakeError, OmniResult};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

/// MIME type assigned to files whose extension is not a known image type.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// A file offered for intake, before any validation.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct RawFile {
    /// File name as presented to the user
    name: String,
    /// Declared MIME type
    declared_type: String,
    /// File contents
    bytes: Vec<u8>,
}

impl RawFile {
    /// File from in-memory parts.
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk; the declared type comes from its extension.
    ///
    /// # Errors
    ///
    /// Returns an intake error if the file cannot be read.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> OmniResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            IntakeError::new(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let declared_type = mime_for_path(path);
        debug!(name = %name, mime = declared_type, size = bytes.len(), "Read file");
        Ok(Self::new(name, declared_type, bytes))
    }

    /// File from a `data:<mime>;base64,<payload>` URI.
    ///
    /// # Errors
    ///
    /// Returns an intake error if the URI is not base64 data.
    ///
    /// # Examples
    ///
    /// ```
    /// use omni_story::RawFile;
    ///
    /// let file = RawFile::from_data_uri("dot.png", "data:image/png;base64,AQID").unwrap();
    /// assert_eq!(file.declared_type(), "image/png");
    /// assert_eq!(file.bytes(), &[1, 2, 3]);
    /// ```
    pub fn from_data_uri(name: impl Into<String>, uri: &str) -> OmniResult<Self> {
        let name = name.into();
        let declared_type = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(mime, _)| mime.to_string())
            .ok_or_else(|| IntakeError::new(format!("{} is not a base64 data URI", name)))?;
        let bytes = STANDARD
            .decode(strip_data_uri(uri))
            .map_err(|e| IntakeError::new(format!("Invalid base64 in {}: {}", name, e)))?;
        Ok(Self::new(name, declared_type, bytes))
    }

    /// Whether the declared type is `image/*`.
    pub fn is_image(&self) -> bool {
        self.declared_type
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    }
}

/// MIME type for a path, from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        _ => UNKNOWN_MIME,
    }
}

/// Strip a `data:<mime>;base64,` prefix, leaving only the payload.
///
/// Text without a data-URI prefix is returned unchanged.
///
/// # Examples
///
/// ```
/// use omni_story::strip_data_uri;
///
/// assert_eq!(strip_data_uri("data:image/jpeg;base64,/9j/4AAQ"), "/9j/4AAQ");
/// assert_eq!(strip_data_uri("/9j/4AAQ"), "/9j/4AAQ");
/// ```
pub fn strip_data_uri(data: &str) -> &str {
    match data.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or(data),
        None => data,
    }
}

/// Issues and tracks preview handles.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: Mutex<HashSet<DisplayHandle>>,
}

impl PreviewRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn live(&self) -> std::sync::MutexGuard<'_, HashSet<DisplayHandle>> {
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issue a fresh `preview://<uuid>` handle.
    pub fn issue(&self) -> DisplayHandle {
        let handle = DisplayHandle::new(format!("preview://{}", uuid::Uuid::new_v4()));
        self.live().insert(handle.clone());
        handle
    }

    /// Release a handle. Returns `false` if it was not live.
    pub fn release(&self, handle: &DisplayHandle) -> bool {
        let released = self.live().remove(handle);
        if !released {
            warn!(handle = %handle, "Released a handle that was not live");
        }
        released
    }

    /// Whether a handle is currently live.
    pub fn is_live(&self, handle: &DisplayHandle) -> bool {
        self.live().contains(handle)
    }

    /// Number of live handles.
    pub fn live_count(&self) -> usize {
        self.live().len()
    }
}

/// Append image files to the working set, up to `max_total` images.
///
/// Non-image files are skipped before the cap is applied, so a non-image
/// never takes a slot from an image offered alongside it. Image files beyond
/// the remaining capacity are dropped. Each accepted image gets a fresh id
/// and a preview handle.
#[instrument(skip_all, fields(existing = existing.len(), offered = new_files.len(), max_total = max_total))]
pub fn accept_files(
    registry: &PreviewRegistry,
    existing: Vec<UploadedImage>,
    new_files: Vec<RawFile>,
    max_total: usize,
) -> Vec<UploadedImage> {
    let remaining = max_total.saturating_sub(existing.len());
    let mut images = existing;

    let (accepted, skipped): (Vec<RawFile>, Vec<RawFile>) =
        new_files.into_iter().partition(RawFile::is_image);
    for file in &skipped {
        debug!(name = %file.name, mime = %file.declared_type, "Skipping non-image file");
    }

    let overflow = accepted.len().saturating_sub(remaining);
    if overflow > 0 {
        warn!(dropped = overflow, max_total, "Image limit reached, dropping files");
    }

    images.extend(accepted.into_iter().take(remaining).map(|file| {
        UploadedImage::new(
            ImageId::generate(),
            file.name,
            STANDARD.encode(&file.bytes),
            file.declared_type,
            registry.issue(),
        )
    }));

    debug!(total = images.len(), "Accepted files");
    images
}

/// Move the image at `from` to position `to`.
///
/// Identity when either index is out of bounds.
pub fn reorder(mut images: Vec<UploadedImage>, from: usize, to: usize) -> Vec<UploadedImage> {
    if from >= images.len() || to >= images.len() {
        return images;
    }
    let image = images.remove(from);
    images.insert(to, image);
    images
}

/// Remove the image with `id`, releasing its preview handle.
pub fn remove(
    registry: &PreviewRegistry,
    images: Vec<UploadedImage>,
    id: &ImageId,
) -> Vec<UploadedImage> {
    images
        .into_iter()
        .filter(|image| {
            if image.id() == id {
                registry.release(image.display());
                false
            } else {
                true
            }
        })
        .collect()
}

/// Release every image's preview handle. Returns how many were live.
pub fn release_all(registry: &PreviewRegistry, images: Vec<UploadedImage>) -> usize {
    images
        .iter()
        .filter(|image| registry.release(image.display()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> RawFile {
        RawFile::new(name, "image/png", vec![1, 2, 3])
    }

    #[test]
    fn data_uri_prefix_never_reaches_payload() {
        let registry = PreviewRegistry::new();
        let file = RawFile::from_data_uri("a.jpg", "data:image/jpeg;base64,AQID").unwrap();
        let images = accept_files(&registry, Vec::new(), vec![file], 10);
        assert_eq!(images[0].base64(), "AQID");
        assert_eq!(images[0].mime_type(), "image/jpeg");
    }

    #[test]
    fn non_data_uri_is_rejected() {
        assert!(RawFile::from_data_uri("a", "https://example.com/a.png").is_err());
    }

    #[test]
    fn ids_and_handles_are_unique() {
        let registry = PreviewRegistry::new();
        let images = accept_files(&registry, Vec::new(), vec![png("a"), png("b")], 10);
        assert_ne!(images[0].id(), images[1].id());
        assert_ne!(images[0].display(), images[1].display());
        assert!(images[0].display().as_str().starts_with("preview://"));
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn mime_type_check_is_case_insensitive() {
        assert!(RawFile::new("a", "IMAGE/PNG", vec![]).is_image());
        assert!(!RawFile::new("a", "text/plain", vec![]).is_image());
        assert!(!RawFile::new("a", "img", vec![]).is_image());
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("notes.txt")), UNKNOWN_MIME);
        assert_eq!(mime_for_path(Path::new("README")), UNKNOWN_MIME);
    }

    #[test]
    fn non_image_does_not_take_the_last_slot() {
        let registry = PreviewRegistry::new();
        let held = accept_files(
            &registry,
            Vec::new(),
            (0..9).map(|i| png(&format!("{i}"))).collect(),
            10,
        );
        let notes = RawFile::new("a.txt", "text/plain", b"notes".to_vec());
        let images = accept_files(&registry, held, vec![notes, png("b.png")], 10);
        assert_eq!(images.len(), 10);
        assert_eq!(images[9].name(), "b.png");
    }

    #[test]
    fn double_release_reports_false() {
        let registry = PreviewRegistry::new();
        let handle = registry.issue();
        assert!(registry.release(&handle));
        assert!(!registry.release(&handle));
        assert_eq!(registry.live_count(), 0);
    }
}
