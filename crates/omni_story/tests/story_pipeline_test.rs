mod test_utils;

use omni_core::{Input, StoryType, ValidationPolicy};
use omni_error::{OmniErrorKind, ServiceErrorKind};
use omni_story::{
    LayoutPlan, PreviewRegistry, RawFile, Session, Span, Step, StoryGenerator, accept_files,
    build_request, describe_mood, grid_columns, parse, span_override,
};
use std::sync::Arc;
use test_utils::{MockDriver, MockResponse, story_json};

fn photos(n: usize) -> Vec<RawFile> {
    (0..n)
        .map(|i| RawFile::new(format!("photo{i}.jpg"), "image/jpeg", vec![0xFF, 0xD8, i as u8]))
        .collect()
}

#[tokio::test]
async fn test_three_image_trip_story_end_to_end() -> anyhow::Result<()> {
    let registry = PreviewRegistry::new();
    let images = accept_files(&registry, Vec::new(), photos(3), 10);
    assert_eq!(images.len(), 3);

    let request = build_request(&images, "", StoryType::Trip)?;
    assert_eq!(
        request.context(),
        "Create an engaging trip story for social media"
    );

    let driver = MockDriver::new_success(format!("```json\n{}\n```", story_json(3, 3)));
    let generator = StoryGenerator::new(driver.clone());
    let stories = generator.generate_from_request(&request).await?;

    assert_eq!(stories.len(), 3);
    for story in &stories {
        assert_eq!(story.frames.len(), 3);
        assert_eq!(grid_columns(story.frames.len()), 2);
        assert_eq!(span_override(story.frames.len(), 0), Span::Double);
        assert_eq!(LayoutPlan::for_frames(story.frames.len()).rows(), 2);
    }

    assert_eq!(driver.call_count(), 1);
    let sent = &driver.requests()[0];
    assert_eq!(sent.image_count(), 3);
    assert!(matches!(sent.inputs().last(), Some(Input::Text(_))));
    Ok(())
}

#[tokio::test]
async fn test_invalid_suggestions_are_discarded_by_default() -> anyhow::Result<()> {
    let mut stories: Vec<serde_json::Value> = serde_json::from_str(&story_json(3, 2))?;
    stories[1]["frames"][1]["imageIndex"] = serde_json::json!(7);
    let driver = MockDriver::new_success(serde_json::to_string(&stories)?);

    let registry = PreviewRegistry::new();
    let images = accept_files(&registry, Vec::new(), photos(2), 10);
    let result = StoryGenerator::new(driver).generate(&images, "", StoryType::Event).await?;

    let titles: Vec<&str> = result.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Story 0", "Story 2"]);
    Ok(())
}

#[tokio::test]
async fn test_trust_policy_keeps_everything() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(story_json(3, 1));
    let registry = PreviewRegistry::new();
    let images = accept_files(&registry, Vec::new(), photos(2), 10);

    let generator = StoryGenerator::with_policy(driver, ValidationPolicy::Trust);
    let result = generator.generate(&images, "", StoryType::Trip).await?;
    assert_eq!(result.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_service_error_surfaces_verbatim() -> anyhow::Result<()> {
    let driver = MockDriver::new_error(ServiceErrorKind::Http {
        status_code: 403,
        message: "API key not valid".to_string(),
    });
    let registry = PreviewRegistry::new();
    let images = accept_files(&registry, Vec::new(), photos(2), 10);

    let err = StoryGenerator::new(driver)
        .generate(&images, "ctx", StoryType::Product)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), OmniErrorKind::Service(_)));
    assert_eq!(err.user_message(), "API key not valid");
    Ok(())
}

#[tokio::test]
async fn test_prose_response_is_malformed() -> anyhow::Result<()> {
    let driver = MockDriver::new_success("Sure! Here are some ideas for your story.");
    let registry = PreviewRegistry::new();
    let images = accept_files(&registry, Vec::new(), photos(2), 10);

    let err = StoryGenerator::new(driver.clone())
        .generate(&images, "", StoryType::Lifestyle)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "malformed_response");
    assert_eq!(driver.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_bad_image_count_never_reaches_driver() -> anyhow::Result<()> {
    let driver = MockDriver::new_success(story_json(3, 1));
    let generator = StoryGenerator::new(driver.clone());

    let err = generator.generate(&[], "", StoryType::Trip).await.unwrap_err();
    assert_eq!(err.status(), 400);
    assert_eq!(driver.call_count(), 0);
    Ok(())
}

#[test]
fn test_accept_files_caps_across_calls() {
    let registry = PreviewRegistry::new();
    let mut offered = photos(6);
    offered.push(RawFile::new("notes.txt", "text/plain", b"hello".to_vec()));

    let images = accept_files(&registry, Vec::new(), offered.clone(), 10);
    assert_eq!(images.len(), 6);
    let images = accept_files(&registry, images, offered, 10);
    assert_eq!(images.len(), 10);
    assert!(images.iter().all(|i| i.mime_type() == "image/jpeg"));
    assert_eq!(registry.live_count(), 10);
}

#[test]
fn test_reorder_and_remove() {
    let registry = PreviewRegistry::new();
    let images = accept_files(&registry, Vec::new(), photos(3), 10);
    let ids: Vec<_> = images.iter().map(|i| i.id().clone()).collect();

    let images = omni_story::reorder(images, 0, 2);
    let order: Vec<_> = images.iter().map(|i| i.id().clone()).collect();
    assert_eq!(order, [ids[1].clone(), ids[2].clone(), ids[0].clone()]);

    let images = omni_story::reorder(images, 0, 3);
    let unchanged: Vec<_> = images.iter().map(|i| i.id().clone()).collect();
    assert_eq!(unchanged, order);

    let images = omni_story::remove(&registry, images, &ids[1]);
    assert_eq!(images.len(), 2);
    assert_eq!(registry.live_count(), 2);
    assert_eq!(omni_story::release_all(&registry, images), 2);
    assert_eq!(registry.live_count(), 0);
}

#[tokio::test]
async fn test_session_flow_releases_handles() -> anyhow::Result<()> {
    let registry = Arc::new(PreviewRegistry::new());
    let driver = MockDriver::new_sequence(vec![
        MockResponse::Error(ServiceErrorKind::Request("connection reset".to_string())),
        MockResponse::Success(story_json(3, 3)),
    ]);
    let generator = StoryGenerator::new(driver);

    let session = Session::new(Arc::clone(&registry))
        .add_files(photos(4))
        .set_story_type(StoryType::Commercial)
        .set_context("Spring launch");
    let first = session.images()[0].id().clone();
    let session = session.remove_image(&first).move_image(2, 0);
    assert_eq!(registry.live_count(), 3);

    let (session, request) = session.begin_generation();
    let outcome = generator.generate_from_request(&request.unwrap()).await;
    let session = session.complete_generation(outcome);
    assert_eq!(session.step(), Step::Upload);
    assert_eq!(session.error(), Some("connection reset"));

    let (session, request) = session.begin_generation();
    assert!(session.error().is_none());
    let outcome = generator.generate_from_request(&request.unwrap()).await;
    let session = session.complete_generation(outcome);
    assert_eq!(session.step(), Step::Results);
    assert_eq!(session.stories().len(), 3);

    let session = session.reset();
    assert_eq!(session.images().len(), 3);
    assert_eq!(session.close(), 3);
    assert_eq!(registry.live_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_mood_description_is_trimmed() -> anyhow::Result<()> {
    let driver = MockDriver::new_success("  warm golden sunset\n");
    let mood = describe_mood(&driver, &omni_core::ImagePayload::new("AAAA", "image/png")).await?;
    assert_eq!(mood, "warm golden sunset");

    let sent = &driver.requests()[0];
    assert_eq!(sent.image_count(), 1);
    assert!(sent.inputs()[1].as_text().is_some_and(|t| t.contains("3-4 words")));
    Ok(())
}

#[test]
fn test_parse_fenced_single_suggestion() {
    let raw = "```json\n[{\"title\":\"T\",\"theme\":\"adventure\",\"frames\":[{\"imageIndex\":0,\"caption\":\"c\",\"narrativeText\":\"n\"}],\"hookText\":\"h\",\"closingText\":\"e\"}]\n```";
    let parsed = parse(raw, 1).unwrap();
    assert_eq!(parsed[0].title, "T");
    assert!(parse("not json at all", 1).is_err());
}
