//! Integration tests for the preview server routes.
//!
//! Each test starts its own server over a temporary catalog and storage
//! directory, then drives it the way the HTMX page does.

use axum::http::StatusCode;
use ylk_integration_tests::{CATALOG, TestServer};

// ============================================================================
// Page & Grid
// ============================================================================

#[tokio::test]
async fn test_health() {
    let server = TestServer::start(CATALOG).await;
    let (status, body) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_page_renders_every_region() {
    let server = TestServer::start(CATALOG).await;
    let (status, body) = server.get("/").await;

    assert_eq!(status, StatusCode::OK);
    for id in [
        "productsGrid",
        "productModal",
        "cartDrawer",
        "cartCountHeader",
        "cartCountFloat",
        "notice",
    ] {
        assert!(body.contains(&format!("id=\"{id}\"")), "missing #{id}");
    }
    assert!(body.contains("Logo Tee"));
    assert!(body.contains("/products/42/quick-add"));
    assert!(body.contains("Your cart is empty."));
    assert!(!body.contains("id=\"emptyHint\""));
}

#[tokio::test]
async fn test_broken_catalog_shows_hint() {
    let server = TestServer::start("{not json").await;
    let (status, body) = server.get("/grid").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"emptyHint\""));
    assert!(body.contains("Could not load products."));
    assert!(!body.contains("product-card"));
}

#[tokio::test]
async fn test_empty_catalog_hint() {
    let server = TestServer::start("[]").await;
    let (_, body) = server.get("/grid").await;
    assert!(body.contains("No products available yet."));
}

// ============================================================================
// Detail Panel
// ============================================================================

#[tokio::test]
async fn test_detail_panel_flow() {
    let server = TestServer::start(CATALOG).await;

    let (status, body) = server.get("/products/tee").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("role=\"dialog\""));
    assert!(body.contains("Small — $5.00"));
    assert!(body.contains("$5.00"));

    let (_, _, body) = server.post("/detail/option", &[("index", "1")]).await;
    assert!(body.contains("aria-checked=\"true\" class=\"option active\""));
    assert!(body.contains("$7.50"));

    let (_, _, body) = server.post("/detail/quantity", &[("quantity", "3")]).await;
    assert!(body.contains("$22.50"));

    let (status, trigger, body) = server.post("/detail/confirm", &[("quantity", "3")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trigger.as_deref(), Some("cart-updated"));
    assert!(!body.contains("role=\"dialog\""));

    let (_, body) = server.get("/cart/count").await;
    assert!(body.contains("3 items in cart"));

    let (_, body) = server.get("/cart/refresh").await;
    assert!(body.contains("Large • $7.50 × 3"));
    assert!(body.contains("$22.50"));
}

#[tokio::test]
async fn test_invalid_quantity_counts_as_one() {
    let server = TestServer::start(CATALOG).await;
    server.get("/products/tee").await;

    let (_, _, body) = server.post("/detail/quantity", &[("quantity", "abc")]).await;
    assert!(body.contains("value=\"1\""));
}

#[tokio::test]
async fn test_overlay_clicks() {
    let server = TestServer::start(CATALOG).await;
    server.get("/products/tee").await;

    let (_, _, body) = server.post("/detail/overlay", &[("target", "content")]).await;
    assert!(body.contains("role=\"dialog\""));

    let (_, _, body) = server.post("/detail/overlay", &[("target", "backdrop")]).await;
    assert!(!body.contains("role=\"dialog\""));

    let (status, _, _) = server.post("/detail/overlay", &[("target", "elsewhere")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detail_gesture_without_panel() {
    let server = TestServer::start(CATALOG).await;
    let (status, _, _) = server.post("/detail/confirm", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_product() {
    let server = TestServer::start(CATALOG).await;
    let (status, _) = server.get("/products/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = server.post("/products/nope/quick-add", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Cart Drawer
// ============================================================================

#[tokio::test]
async fn test_quick_add_merges_lines() {
    let server = TestServer::start(CATALOG).await;

    let (status, trigger, body) = server.post("/products/tee/quick-add", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trigger.as_deref(), Some("cart-updated"));
    assert!(body.contains("id=\"cartCountHeader\""));

    server.post("/products/tee/quick-add", &[]).await;
    let (_, body) = server.get("/cart").await;
    assert!(body.contains("Small • $5.00 × 2"));
    assert!(body.contains("$10.00"));
    assert!(!body.contains("aria-hidden=\"true\""));
}

#[tokio::test]
async fn test_increment_decrement_and_removal_at_zero() {
    let server = TestServer::start(CATALOG).await;
    server.post("/products/42/quick-add", &[]).await;

    let (_, trigger, body) = server.post("/cart/lines/0/increment", &[]).await;
    assert_eq!(trigger.as_deref(), Some("cart-updated"));
    assert!(body.contains("Default • $0.00 × 2"));

    server.post("/cart/lines/0/decrement", &[]).await;
    let (_, _, body) = server.post("/cart/lines/0/decrement", &[]).await;
    assert!(body.contains("Your cart is empty."));

    let (status, _, _) = server.post("/cart/lines/0/increment", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_needs_confirmation() {
    let server = TestServer::start(CATALOG).await;
    server.post("/products/tee/quick-add", &[]).await;

    let (status, trigger, body) = server.post("/cart/lines/0/remove", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(trigger.is_none());
    assert!(body.contains("Small • $5.00 × 1"));

    let (_, trigger, body) = server
        .post("/cart/lines/0/remove", &[("confirm", "true")])
        .await;
    assert_eq!(trigger.as_deref(), Some("cart-updated"));
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_clear_needs_confirmation() {
    let server = TestServer::start(CATALOG).await;
    server.post("/products/tee/quick-add", &[]).await;
    server.post("/products/42/quick-add", &[]).await;

    let (_, _, body) = server.post("/cart/clear", &[("confirm", "false")]).await;
    assert!(body.contains("Sticker"));

    let (_, _, body) = server.post("/cart/clear", &[("confirm", "true")]).await;
    assert!(body.contains("Your cart is empty."));
    assert!(body.contains("$0.00"));
}

#[tokio::test]
async fn test_close_drawer_keeps_cart() {
    let server = TestServer::start(CATALOG).await;
    server.post("/products/tee/quick-add", &[]).await;
    server.get("/cart").await;

    let (_, _, body) = server.post("/cart/close", &[]).await;
    assert!(body.contains("aria-hidden=\"true\""));
    assert!(body.contains("Small • $5.00 × 1"));
}

#[tokio::test]
async fn test_checkout_notice_keeps_cart() {
    let server = TestServer::start(CATALOG).await;
    server.post("/products/tee/quick-add", &[]).await;

    let (status, _, body) = server.post("/checkout", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Demo checkout — no real payment processed."));

    let (_, body) = server.get("/cart/count").await;
    assert!(body.contains("1 item in cart"));
}
