//! Integration tests for the YLK storefront widget.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ylk-integration-tests
//! ```
//!
//! Nothing external is needed: every test starts its own preview server on
//! an ephemeral port, over a temporary catalog and storage directory.
//!
//! # Test Categories
//!
//! - `preview_server` - HTTP routes of the preview server
//! - `cart_flow` - cart persistence shared between contexts
//! - `catalog_http` - fetching the catalog over HTTP
//! - `router` - single requests against the router, without a listener

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use ylk_storefront::catalog::CatalogLocation;
use ylk_storefront::config::StorefrontConfig;
use ylk_storefront::context::AppContext;
use ylk_storefront::routes;
use ylk_storefront::state::AppState;
use ylk_storefront::storage::{FileStorage, LocalStorage};

/// Catalog used by most tests: one product with options, one without.
pub const CATALOG: &str = r#"[
    {"id": "tee", "title": "Logo Tee", "description": "Soft cotton", "image": "tee.png",
     "options": [{"name": "Small", "price": 5}, {"name": "Large", "price": 7.5}]},
    {"id": 42, "title": "Sticker", "description": "Vinyl"}
]"#;

/// A preview server running in the background.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub dir: TempDir,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over `catalog_json`, with a fresh storage directory.
    pub async fn start(catalog_json: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("products.json"), catalog_json)
            .expect("Failed to write catalog");
        Self::start_in(dir).await
    }

    /// Start a server over an existing directory holding `products.json`.
    pub async fn start_in(dir: TempDir) -> Self {
        let config = test_config(dir.path());
        let storage: Arc<dyn LocalStorage> = Arc::new(
            FileStorage::open(&config.data_dir).expect("Failed to open storage"),
        );

        let mut context = AppContext::open(config.catalog.clone().into_source(), Arc::clone(&storage));
        let _ = context.load_catalog().await;

        let app = routes::app(AppState::new(config, context, storage));
        let (addr, handle) = serve(app).await;

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            dir,
            handle,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path and return status and body.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        read(resp).await
    }

    /// POST a form to a path and return status, `HX-Trigger` header and body.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> (StatusCode, Option<String>, String) {
        let resp = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to send request");
        let trigger = resp
            .headers()
            .get("HX-Trigger")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let (status, body) = read(resp).await;
        (status, trigger, body)
    }

    /// Stop the server, keeping its directory for a restart.
    pub fn stop(self) -> TempDir {
        self.handle.abort();
        self.dir
    }
}

/// Configuration pointing at `dir/products.json` and `dir/data`.
#[must_use]
pub fn test_config(dir: &Path) -> StorefrontConfig {
    let catalog = dir.join("products.json").display().to_string();
    let data_dir = dir.join("data").display().to_string();
    let static_dir = dir.join("static").display().to_string();
    let mut config = StorefrontConfig::from_vars(|key| match key {
        "YLK_CATALOG" => Some(catalog.clone()),
        "YLK_DATA_DIR" => Some(data_dir.clone()),
        "YLK_STATIC_DIR" => Some(static_dir.clone()),
        _ => None,
    })
    .expect("Failed to build test config");
    config.port = 0;
    config
}

/// Serve a router on an ephemeral local port.
pub async fn serve(app: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, handle)
}

/// Serve a fixed catalog response at `/products.json`.
pub async fn serve_catalog(status: StatusCode, body: &'static str) -> (CatalogLocation, JoinHandle<()>) {
    let app = Router::new().route("/products.json", get(move || async move { (status, body) }));
    let (addr, handle) = serve(app).await;
    let location = CatalogLocation::parse(&format!("http://{addr}/products.json"))
        .expect("Failed to parse catalog URL");
    (location, handle)
}

async fn read(resp: reqwest::Response) -> (StatusCode, String) {
    let status = StatusCode::from_u16(resp.status().as_u16()).expect("Invalid status code");
    let body = resp.text().await.expect("Failed to read response body");
    (status, body)
}
