//! Router tests without a listener, using `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;
use ylk_integration_tests::{CATALOG, test_config};
use ylk_storefront::context::AppContext;
use ylk_storefront::routes;
use ylk_storefront::signal::CATALOG_SIGNAL_KEY;
use ylk_storefront::state::AppState;
use ylk_storefront::storage::{LocalStorage, MemoryStorage};

async fn app(dir: &TempDir, storage: &MemoryStorage) -> axum::Router {
    std::fs::write(dir.path().join("products.json"), CATALOG).expect("Failed to write catalog");
    let config = test_config(dir.path());
    let storage: Arc<dyn LocalStorage> = Arc::new(storage.handle());
    let mut context = AppContext::open(config.catalog.clone().into_source(), Arc::clone(&storage));
    context.load_catalog().await.expect("Failed to load catalog");
    routes::app(AppState::new(config, context, storage))
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::empty())
        .expect("Failed to build request")
}

#[tokio::test]
async fn test_signal_route_writes_sentinel() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = MemoryStorage::new();
    let app = app(&dir, &storage).await;

    let response = app
        .oneshot(post("/catalog/signal"))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(
        storage
            .get_item(CATALOG_SIGNAL_KEY)
            .expect("Failed to read storage")
            .is_some()
    );
}

#[tokio::test]
async fn test_reload_route_picks_up_new_catalog() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = MemoryStorage::new();
    let app = app(&dir, &storage).await;

    std::fs::write(
        dir.path().join("products.json"),
        r#"[{"id": "new", "title": "Brand New"}]"#,
    )
    .expect("Failed to rewrite catalog");

    let response = app
        .oneshot(post("/catalog/reload"))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = String::from_utf8(body.to_vec()).expect("Body is not UTF-8");
    assert!(body.contains("Brand New"));
    assert!(!body.contains("Logo Tee"));
}

#[tokio::test]
async fn test_bad_line_index_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = MemoryStorage::new();
    let app = app(&dir, &storage).await;

    let response = app
        .oneshot(post("/cart/lines/first/increment"))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_static_fallback_serves_assets() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir(dir.path().join("static")).expect("Failed to create static dir");
    std::fs::write(dir.path().join("static").join("styles.css"), "body {}")
        .expect("Failed to write asset");
    let storage = MemoryStorage::new();
    let app = app(&dir, &storage).await;

    let request = Request::builder()
        .uri("/styles.css")
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app.oneshot(request).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
}
