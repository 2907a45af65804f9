//! Story generation command handlers.

use super::commands::GenerateArgs;
use omni::{
    ComicRenderer, ExportError, ExportErrorKind, GeminiClient, GeminiConfig, LayoutPlan,
    OmniConfig, OmniResult, PreviewRegistry, RawFile, RenderOptions, Session, StoryGenerator,
    StorySuggestion, UploadedImage, Vision, accept_files, describe_mood,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Generate stories for local image files and print them.
#[instrument(skip_all, fields(images = args.images.len(), story_type = %args.story_type))]
pub async fn run_generate(config: &OmniConfig, args: GenerateArgs) -> CliResult<()> {
    let files = args
        .images
        .iter()
        .map(RawFile::from_path)
        .collect::<OmniResult<Vec<_>>>()?;

    let client = GeminiClient::new(GeminiConfig::from_env(&config.gemini)?)?;
    warn_unsupported(&client, &files);

    let session = Session::with_limits(
        Arc::new(PreviewRegistry::new()),
        config.intake.max_images,
        config.story.min_images,
    )
    .add_files(files)
    .set_story_type(args.story_type)
    .set_context(args.context.clone().unwrap_or_default());
    info!(accepted = session.images().len(), "Images ready");

    let (session, request) = session.begin_generation();
    let Some(request) = request else {
        return Err(session
            .error()
            .unwrap_or("Could not build story request")
            .into());
    };

    let generator = StoryGenerator::with_policy(client, config.story.validation);
    let outcome = generator.generate_from_request(&request).await;
    let session = session.complete_generation(outcome);
    if let Some(message) = session.error() {
        return Err(message.into());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.stories())?);
    } else {
        for (number, story) in session.stories().iter().enumerate() {
            print!("{}", describe_story(number + 1, story));
        }
    }

    if let Some(dir) = args.export_target(&config.export.out_dir) {
        let renderer = ComicRenderer::new(RenderOptions::new(
            config.export.panel_width,
            config.export.gutter,
            config.export.scale,
        ));
        for path in export_all(&renderer, session.images(), session.stories(), &dir)? {
            println!("Exported {}", path.display());
        }
    }

    let released = session.close();
    debug!(released, "Session closed");
    Ok(())
}

/// Print a short mood description of one image.
#[instrument(skip(config))]
pub async fn run_mood(config: &OmniConfig, image: &Path) -> CliResult<()> {
    let file = RawFile::from_path(image)?;
    if !file.is_image() {
        return Err(format!("{} is not an image", image.display()).into());
    }

    let client = GeminiClient::new(GeminiConfig::from_env(&config.gemini)?)?;
    warn_unsupported(&client, std::slice::from_ref(&file));

    let registry = PreviewRegistry::new();
    let images = accept_files(&registry, Vec::new(), vec![file], 1);
    let payloads: Vec<_> = images.iter().map(UploadedImage::payload).collect();
    omni::release_all(&registry, images);

    for payload in &payloads {
        println!("{}", describe_mood(&client, payload).await?);
    }
    Ok(())
}

fn warn_unsupported<V: Vision>(driver: &V, files: &[RawFile]) {
    for file in files {
        if !file.is_image() {
            warn!(file = %file.name(), mime = %file.declared_type(), "Skipping non-image file");
        } else if !driver.supports_format(file.declared_type()) {
            warn!(
                file = %file.name(),
                mime = %file.declared_type(),
                "Image format may be rejected by the model"
            );
        }
    }
}

/// Export every story into `dir`, creating it if needed.
fn export_all(
    renderer: &ComicRenderer,
    images: &[UploadedImage],
    stories: &[StorySuggestion],
    dir: &Path,
) -> OmniResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| {
        ExportError::new(ExportErrorKind::Write {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })
    })?;

    let payloads: Vec<_> = images.iter().map(UploadedImage::payload).collect();
    stories
        .iter()
        .map(|story| renderer.export(story, &payloads, dir))
        .collect()
}

/// Human-readable rendering of one suggestion with its grid placement.
fn describe_story(number: usize, story: &StorySuggestion) -> String {
    let plan = LayoutPlan::for_frames(story.frame_count());
    let mut out = String::new();

    let _ = writeln!(out, "Story {}: {} [{}]", number, story.title, story.theme);
    let _ = writeln!(out, "  {}", story.hook_text);
    for (frame, placement) in story.frames.iter().zip(plan.placements()) {
        let _ = writeln!(
            out,
            "  - image {} (row {}, col {}, span {}): {}",
            frame.image_index + 1,
            placement.row + 1,
            placement.column + 1,
            placement.span.columns(),
            frame.caption
        );
        let _ = writeln!(out, "      {}", frame.narrative_text);
    }
    let _ = writeln!(out, "  {}", story.closing_text);
    out
}
