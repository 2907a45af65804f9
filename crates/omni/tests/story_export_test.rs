mod test_utils;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageFormat, Rgb, RgbImage};
use omni::{
    ComicRenderer, PreviewRegistry, RawFile, RenderOptions, Session, Step, StoryGenerator,
    StoryType, UploadedImage, Vision, describe_mood,
};
use std::io::Cursor;
use std::sync::Arc;
use test_utils::FixedDriver;

fn png(color: [u8; 3]) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::from_pixel(30, 40, Rgb(color))
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn reply() -> String {
    let story = |title: &str, order: [usize; 3]| {
        serde_json::json!({
            "title": title,
            "theme": "celebration",
            "frames": order.iter().map(|i| serde_json::json!({
                "imageIndex": i,
                "caption": "Cheers",
                "narrativeText": "Everyone came."
            })).collect::<Vec<_>>(),
            "hookText": "Guess who showed up",
            "closingText": "Until next year"
        })
    };
    format!(
        "```json\n{}\n```",
        serde_json::json!([
            story("First", [0, 1, 2]),
            story("Second", [2, 1, 0]),
            story("Third", [1, 0, 2])
        ])
    )
}

#[tokio::test]
async fn test_session_generate_and_export() -> anyhow::Result<()> {
    let driver = Arc::new(FixedDriver::new(reply()));
    let generator = StoryGenerator::new(driver.clone());

    let registry = Arc::new(PreviewRegistry::new());
    let session = Session::new(registry.clone())
        .add_files(vec![
            RawFile::new("a.png", "image/png", png([200, 30, 30])),
            RawFile::new("notes.txt", "text/plain", b"ignored".to_vec()),
            RawFile::new("b.png", "image/png", png([30, 200, 30])),
            RawFile::new("c.png", "image/png", png([30, 30, 200])),
        ])
        .set_story_type(StoryType::Event)
        .set_context("Office party");
    assert_eq!(session.images().len(), 3);
    assert_eq!(registry.live_count(), 3);

    let (session, request) = session.begin_generation();
    let request = request.expect("three images are enough");
    let session = session.complete_generation(generator.generate_from_request(&request).await);

    assert_eq!(session.step(), Step::Results);
    assert_eq!(session.stories().len(), 3);
    assert_eq!(driver.image_counts(), vec![3]);

    let dir = tempfile::tempdir()?;
    let renderer = ComicRenderer::new(RenderOptions::new(60, 4, 1));
    let payloads: Vec<_> = session.images().iter().map(UploadedImage::payload).collect();
    let first = renderer.export(&session.stories()[0], &payloads, dir.path())?;
    let second = renderer.export(&session.stories()[1], &payloads, dir.path())?;
    assert_ne!(first, second);
    assert!(
        first
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("omni-story-") && n.ends_with(".png"))
    );
    let exported = image::open(&first)?;
    assert!(exported.width() > 0 && exported.height() > 0);

    assert_eq!(session.close(), 3);
    assert_eq!(registry.live_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_mood_through_facade() -> anyhow::Result<()> {
    let driver = FixedDriver::new("  warm golden calm \n");
    assert!(driver.supports_format("IMAGE/PNG"));
    assert!(!driver.supports_format("image/heic"));

    let payload = omni::ImagePayload::new(STANDARD.encode(png([1, 2, 3])), "image/png");
    let mood = describe_mood(&driver, &payload).await?;
    assert_eq!(mood, "warm golden calm");
    assert_eq!(driver.image_counts(), vec![1]);
    Ok(())
}
