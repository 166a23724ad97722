//! Router-level tests for `GET /`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]


use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::util::ServiceExt;

use webstats_core::render::{FragmentTemplates, PLACEHOLDER_ICON};
use webstats_server::{app_state::AppState, composer::PageComposer, router};

use test_support::{shipped_template, snapshot, write_template, StaticProvider};

fn app(provider: Arc<StaticProvider>, template: &Path, timeout: Duration) -> Router {
    let composer = PageComposer::new(provider, template, FragmentTemplates::builtin().unwrap());
    router::build_router(AppState::new(composer, timeout))
}

async fn get(app: &Router) -> (StatusCode, Option<String>, String) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let ctype = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, ctype, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn renders_shipped_template() {
    let provider = Arc::new(StaticProvider::new(snapshot("Shisha#0420")));
    let app = app(provider, &shipped_template(), Duration::from_secs(5));

    let (status, ctype, body) = get(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctype.unwrap().starts_with("text/html"));
    assert!(body.contains("<h1>Shisha#0420</h1>"));
    assert!(body.contains("Owned by mezo#0001"));
    assert!(body.contains("Up for 1 hour, 2 minutes, 3 seconds"));
    assert!(body.contains("Alpha (3)"));
    assert!(body.contains(PLACEHOLDER_ICON));
    assert!(body.contains("Page generated on "));
    assert!(body.contains("body { font-family"));
    assert!(!body.contains("{{"));
}

#[tokio::test]
async fn every_request_pulls_a_fresh_snapshot() {
    let provider = Arc::new(StaticProvider::new(snapshot("First#0001")));
    let app = app(Arc::clone(&provider), &shipped_template(), Duration::from_secs(5));

    let (_, _, first) = get(&app).await;
    provider.set(snapshot("Second#0002"));
    let (_, _, second) = get(&app).await;

    assert!(first.contains("First#0001"));
    assert!(second.contains("Second#0002"));
    assert!(!second.contains("First#0001"));
}

#[tokio::test]
async fn snapshot_failure_is_500_and_route_recovers() {
    let provider = Arc::new(StaticProvider::new(snapshot("Shisha#0420")));
    let app = app(Arc::clone(&provider), &shipped_template(), Duration::from_secs(5));

    provider.set_failing(true);
    let (status, _, body) = get(&app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("SNAPSHOT_UNAVAILABLE"));

    provider.set_failing(false);
    let (status, _, body) = get(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Shisha#0420"));
}

#[tokio::test]
async fn invalid_snapshot_is_500() {
    let mut snap = snapshot("Shisha#0420");
    snap.process.cpu_percent = -1.0;
    let app = app(Arc::new(StaticProvider::new(snap)), &shipped_template(), Duration::from_secs(5));

    let (status, _, body) = get(&app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("SNAPSHOT_UNAVAILABLE"));
}

#[tokio::test]
async fn missing_template_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(StaticProvider::new(snapshot("Shisha#0420")));
    let app = app(provider, &dir.path().join("nope.html"), Duration::from_secs(5));

    let (status, _, body) = get(&app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("TEMPLATE_UNAVAILABLE"));
}

#[tokio::test]
async fn unknown_template_field_is_500_every_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_template(dir.path(), "<p>{name}</p><p>{threads}</p><p>{io_writesdata}</p>");
    let provider = Arc::new(StaticProvider::new(snapshot("Shisha#0420")));
    let app = app(provider, &path, Duration::from_secs(5));

    for _ in 0..2 {
        let (status, _, body) = get(&app).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("MISSING_FIELD"));
        assert!(body.contains("io_writesdata"));
    }
}

#[tokio::test]
async fn template_edits_apply_to_next_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_template(dir.path(), "<b>{name}</b>");
    let provider = Arc::new(StaticProvider::new(snapshot("Shisha#0420")));
    let app = app(provider, &path, Duration::from_secs(5));

    assert_eq!(get(&app).await.2, "<b>Shisha#0420</b>");
    write_template(dir.path(), "<i>{name} / {total_rooms}</i>");
    assert_eq!(get(&app).await.2, "<i>Shisha#0420 / 1</i>");
}

#[tokio::test]
async fn slow_render_is_504() {
    let provider = Arc::new(StaticProvider::slow(
        snapshot("Shisha#0420"),
        Duration::from_secs(2),
    ));
    let app = app(provider, &shipped_template(), Duration::from_millis(50));

    let (status, _, body) = get(&app).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body.starts_with("TIMEOUT"));
}
