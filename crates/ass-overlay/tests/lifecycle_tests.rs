//! Host-driven load lifecycle through the public renderer API

use ass_overlay::{HeadlessSurface, LoadState, OverlayError, RenderContext, Renderer};
use pretty_assertions::assert_eq;

const DOCUMENT: &str = "[Script Info]
PlayResX: 640
PlayResY: 480

[Events]
Format: Layer, Start, End, Style, Text
Dialogue: 0,0:00:00.00,0:00:02.00,Default,first
Dialogue: 0,0:00:01.00,0:00:03.00,Default,second
Dialogue: 0,0:00:02.00,0:00:04.00,Default,third
";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn fetched_document_renders_after_build() {
    init_logging();
    let mut surface = HeadlessSurface::new();
    let mut renderer = Renderer::default();
    renderer.set_source("movie.ass", &mut surface);

    let request = renderer.init().expect("fetch");
    assert_eq!(request.source, "movie.ass");
    assert_eq!(renderer.state(), LoadState::Initializing);

    assert!(renderer
        .complete_load(request.ticket, Ok(DOCUMENT.to_string()), &mut surface)
        .is_none());
    assert!(renderer.pending_tasks() > 0);

    let outcome = renderer.tick(1.5, &mut surface);
    assert_eq!(renderer.state(), LoadState::Initialized);
    assert_eq!(outcome.activated, 2);
    assert_eq!(surface.element_count(), 2);
}

#[test]
fn swapping_source_mid_fetch_restarts() {
    init_logging();
    let mut surface = HeadlessSurface::new();
    let mut renderer = Renderer::default();
    renderer.set_source("a.ass", &mut surface);
    let first = renderer.init().expect("fetch");

    renderer.set_source("b.ass", &mut surface);
    assert_eq!(renderer.state(), LoadState::CancelingInit);

    let retry = renderer
        .complete_load(first.ticket, Ok(DOCUMENT.to_string()), &mut surface)
        .expect("restart");
    assert_eq!(retry.source, "b.ass");
    assert_ne!(retry.ticket, first.ticket);
    assert!(renderer.subtitles().is_empty());
    assert_eq!(renderer.state(), LoadState::Initializing);
}

#[test]
fn swapping_source_mid_build_cancels_the_rest() {
    init_logging();
    let mut surface = HeadlessSurface::new();
    let mut renderer = Renderer::new(RenderContext::default().with_build_budget(1));
    renderer.set_source("a.ass", &mut surface);
    let request = renderer.init().expect("fetch");
    renderer.complete_load(request.ticket, Ok(DOCUMENT.to_string()), &mut surface);

    let outcome = renderer.tick(0.0, &mut surface);
    assert!(outcome.request.is_none());
    assert_eq!(renderer.state(), LoadState::Initializing);

    renderer.set_source("b.ass", &mut surface);
    let outcome = renderer.tick(0.0, &mut surface);
    let retry = outcome.request.expect("new fetch");
    assert_eq!(retry.source, "b.ass");
    assert_eq!(renderer.pending_tasks(), 0);
    assert!(renderer.subtitles().is_empty());
    assert_eq!(surface.element_count(), 0);
}

#[test]
fn stale_answers_are_ignored() {
    init_logging();
    let mut surface = HeadlessSurface::new();
    let mut renderer = Renderer::default();
    renderer.set_source("a.ass", &mut surface);
    let first = renderer.init().expect("fetch");
    renderer.complete_load(first.ticket, Ok(DOCUMENT.to_string()), &mut surface);
    renderer.tick(0.5, &mut surface);
    assert_eq!(renderer.subtitles().len(), 3);

    assert!(renderer
        .complete_load(first.ticket, Err(OverlayError::Load("late".to_string())), &mut surface)
        .is_none());
    assert_eq!(renderer.state(), LoadState::Initialized);
    assert!(renderer.last_error().is_none());
}

#[test]
fn failed_fetch_can_be_retried() {
    init_logging();
    let mut surface = HeadlessSurface::new();
    let mut renderer = Renderer::default();
    renderer.set_source("missing.ass", &mut surface);
    let request = renderer.init().expect("fetch");
    renderer.complete_load(
        request.ticket,
        Err(OverlayError::Load("404".to_string())),
        &mut surface,
    );
    assert_eq!(renderer.state(), LoadState::Failed);
    assert!(renderer.last_error().is_some_and(OverlayError::is_recoverable));
    assert_eq!(renderer.tick(1.0, &mut surface).activated, 0);

    let retry = renderer.init().expect("retry");
    assert_ne!(retry.ticket, request.ticket);
    assert!(renderer.last_error().is_none());
    renderer.complete_load(retry.ticket, Ok(DOCUMENT.to_string()), &mut surface);
    assert_eq!(renderer.tick(0.5, &mut surface).activated, 1);
}

#[test]
fn resume_after_clean_fetches_again() {
    init_logging();
    let mut surface = HeadlessSurface::new();
    let mut renderer = Renderer::default();
    renderer.set_source("a.ass", &mut surface);
    let request = renderer.init().expect("fetch");
    renderer.complete_load(request.ticket, Ok(DOCUMENT.to_string()), &mut surface);
    renderer.tick(1.0, &mut surface);
    assert!(surface.element_count() > 0);

    renderer.clean(&mut surface);
    assert_eq!(renderer.state(), LoadState::Uninitialized);
    assert_eq!(surface.element_count(), 0);

    renderer.pause();
    assert!(!renderer.running());
    let again = renderer.resume().expect("fetch");
    assert_eq!(again.source, "a.ass");
    assert!(renderer.running());
}
