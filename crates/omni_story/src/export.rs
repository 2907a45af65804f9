//! PNG rendering of a story on its layout grid.

use crate::layout::{LayoutPlan, Placement};
use crate::theme::ThemePalette;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, imageops::FilterType};
use omni_core::{ImagePayload, StorySuggestion};
use omni_error::{ExportError, ExportErrorKind, OmniResult};
use std::fs::OpenOptions;
use std::io::{Cursor, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Export file name for a millisecond timestamp.
///
/// # Examples
///
/// ```
/// use omni_story::export_filename;
///
/// assert_eq!(export_filename(1700000000123), "omni-story-1700000000123.png");
/// ```
pub fn export_filename(timestamp_ms: i64) -> String {
    format!("omni-story-{}.png", timestamp_ms)
}

/// Sizes used by [`ComicRenderer`], in unscaled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct RenderOptions {
    /// Width of a single-column panel
    panel_width: u32,
    /// Space between panels
    gutter: u32,
    /// Space around the grid
    padding: u32,
    /// Output scale factor
    scale: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            panel_width: 240,
            gutter: 8,
            padding: 12,
            scale: 2,
        }
    }
}

/// Largest accepted panel width, in unscaled pixels.
pub const MAX_PANEL_WIDTH: u32 = 1024;

/// Largest accepted gutter, in unscaled pixels.
pub const MAX_GUTTER: u32 = 256;

/// Largest accepted scale factor.
pub const MAX_SCALE: u32 = 4;

impl RenderOptions {
    /// Options with the given panel width, gutter and scale.
    ///
    /// Values are clamped: panel width to `1..=MAX_PANEL_WIDTH`, gutter to
    /// `MAX_GUTTER`, scale to `1..=MAX_SCALE`. Every canvas dimension then
    /// fits in `u32`.
    pub fn new(panel_width: u32, gutter: u32, scale: u32) -> Self {
        Self {
            panel_width: panel_width.clamp(1, MAX_PANEL_WIDTH),
            gutter: gutter.min(MAX_GUTTER),
            scale: scale.clamp(1, MAX_SCALE),
            ..Self::default()
        }
    }
}

/// Composes one story suggestion into a single image.
///
/// Panels are 3:4 portrait cells cover-cropped from the source images and
/// laid out per [`LayoutPlan`] over the theme's gradient. Frames whose image
/// index has no image are skipped.
#[derive(Debug, Clone, Default)]
pub struct ComicRenderer {
    options: RenderOptions,
}

struct Cell {
    frame: usize,
    image_index: usize,
    placement: Placement,
}

impl ComicRenderer {
    /// Renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn cell_width(&self, columns: usize) -> u32 {
        let columns = columns as u32;
        let s = self.options.scale;
        columns * self.options.panel_width * s
            + columns.saturating_sub(1) * self.options.gutter * s
    }

    fn cell_height(&self, columns: usize) -> u32 {
        self.cell_width(columns) * 4 / 3
    }

    /// Render a story to an RGB canvas.
    ///
    /// # Errors
    ///
    /// Returns an export error when no frame has an image, or an image cannot
    /// be decoded.
    #[instrument(
        skip(self, story, images),
        fields(title = %story.title, frames = story.frames.len(), images = images.len())
    )]
    pub fn render(
        &self,
        story: &StorySuggestion,
        images: &[ImagePayload],
    ) -> OmniResult<RgbImage> {
        let plan = LayoutPlan::for_frames(story.frames.len());

        let present: Vec<usize> = story
            .frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| frame.image_index < images.len())
            .map(|(index, _)| index)
            .collect();
        if present.is_empty() {
            return Err(ExportError::new(ExportErrorKind::Empty).into());
        }
        if present.len() < story.frames.len() {
            debug!(
                skipped = story.frames.len() - present.len(),
                "Skipping frames without an image"
            );
        }

        let cells: Vec<Cell> = present
            .iter()
            .zip(plan.place(&present))
            .map(|(&frame, placement)| Cell {
                frame,
                image_index: story.frames[frame].image_index,
                placement,
            })
            .collect();

        let s = self.options.scale;
        let gutter = self.options.gutter * s;
        let padding = self.options.padding * s;
        let rows = cells.last().map(|c| c.placement.row + 1).unwrap_or(0);

        let mut row_heights = vec![0u32; rows];
        for cell in &cells {
            let height = self.cell_height(cell.placement.span.columns());
            let slot = &mut row_heights[cell.placement.row];
            *slot = (*slot).max(height);
        }

        let width = padding * 2 + self.cell_width(plan.column_count());
        let height = padding * 2
            + row_heights.iter().sum::<u32>()
            + (rows as u32).saturating_sub(1) * gutter;

        let palette = ThemePalette::for_theme(&story.theme);
        let mut canvas = RgbImage::from_fn(width, height, |x, y| {
            let t = (x as f32 / width as f32 + y as f32 / height as f32) / 2.0;
            palette.gradient_at(t)
        });

        let column_step = self.options.panel_width * s + gutter;
        for cell in &cells {
            let columns = cell.placement.span.columns().min(plan.column_count());
            let panel_width = self.cell_width(columns);
            let panel_height = self.cell_height(columns);
            let x = padding + cell.placement.column as u32 * column_step;
            let y = padding
                + row_heights[..cell.placement.row].iter().sum::<u32>()
                + cell.placement.row as u32 * gutter;

            let source = decode(cell.image_index, &images[cell.image_index])?;
            let panel = source
                .resize_to_fill(panel_width, panel_height, FilterType::Lanczos3)
                .to_rgb8();
            image::imageops::overlay(&mut canvas, &panel, i64::from(x), i64::from(y));
            draw_border(&mut canvas, x, y, panel_width, panel_height, 2 * s, palette.accent);
            debug!(frame = cell.frame, x, y, panel_width, panel_height, "Placed panel");
        }

        Ok(canvas)
    }

    /// Render and encode as PNG bytes.
    pub fn render_png(
        &self,
        story: &StorySuggestion,
        images: &[ImagePayload],
    ) -> OmniResult<Vec<u8>> {
        let canvas = self.render(story, images)?;
        let mut bytes = Cursor::new(Vec::new());
        canvas.write_to(&mut bytes, ImageFormat::Png).map_err(|e| {
            ExportError::new(ExportErrorKind::Write {
                path: "<memory>".to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(bytes.into_inner())
    }

    /// Render and write a PNG to `path`, replacing any existing file.
    pub fn export_to(
        &self,
        story: &StorySuggestion,
        images: &[ImagePayload],
        path: &Path,
    ) -> OmniResult<()> {
        let bytes = self.render_png(story, images)?;
        std::fs::write(path, bytes).map_err(|e| write_error(path, &e))?;
        info!(path = %path.display(), "Exported story");
        Ok(())
    }

    /// Render and write `omni-story-<timestamp>.png` into `dir`.
    ///
    /// The timestamp is the current time in milliseconds, advanced past any
    /// file that already exists. The file is created exclusively, so
    /// concurrent exports never overwrite each other.
    pub fn export(
        &self,
        story: &StorySuggestion,
        images: &[ImagePayload],
        dir: &Path,
    ) -> OmniResult<PathBuf> {
        let bytes = self.render_png(story, images)?;
        let mut timestamp = chrono::Utc::now().timestamp_millis();
        loop {
            let path = dir.join(export_filename(timestamp));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&bytes).map_err(|e| write_error(&path, &e))?;
                    info!(path = %path.display(), "Exported story");
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => timestamp += 1,
                Err(e) => return Err(write_error(&path, &e).into()),
            }
        }
    }
}

fn write_error(path: &Path, err: &std::io::Error) -> ExportError {
    ExportError::new(ExportErrorKind::Write {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

fn decode(index: usize, payload: &ImagePayload) -> OmniResult<DynamicImage> {
    let bytes = STANDARD
        .decode(crate::strip_data_uri(&payload.base64))
        .map_err(|e| {
            ExportError::new(ExportErrorKind::Base64 {
                index,
                reason: e.to_string(),
            })
        })?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| {
        ExportError::new(ExportErrorKind::Decode {
            index,
            reason: e.to_string(),
        })
    })?;
    Ok(decoded)
}

fn draw_border(
    canvas: &mut RgbImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    thickness: u32,
    color: Rgb<u8>,
) {
    let x_end = (x + width).min(canvas.width());
    let y_end = (y + height).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            let on_edge = px < x + thickness
                || py < y + thickness
                || px + thickness >= x_end
                || py + thickness >= y_end;
            if on_edge {
                canvas.put_pixel(px, py, color);
            }
        }
    }
}
