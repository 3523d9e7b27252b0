//! Where the catalog document comes from.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use url::Url;
use ylk_core::Product;

use super::CatalogError;

/// A provider of the catalog document.
#[async_trait]
pub trait CatalogSource: Send + Sync + fmt::Debug {
    /// Fetch and parse the full product list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport, status or parse failure.
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Configured catalog location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    Url(Url),
    Path(PathBuf),
}

impl CatalogLocation {
    /// Interpret `http://` and `https://` values as URLs and anything else as
    /// a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Location` for an empty value or a malformed URL.
    pub fn parse(value: &str) -> Result<Self, CatalogError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CatalogError::Location("empty catalog location".to_string()));
        }
        if value.starts_with("http://") || value.starts_with("https://") {
            let url = Url::parse(value).map_err(|e| CatalogError::Location(e.to_string()))?;
            return Ok(Self::Url(url));
        }
        Ok(Self::Path(PathBuf::from(value)))
    }

    /// Build the matching source.
    #[must_use]
    pub fn into_source(self) -> std::sync::Arc<dyn CatalogSource> {
        match self {
            Self::Url(url) => std::sync::Arc::new(HttpCatalogSource::new(url)),
            Self::Path(path) => std::sync::Arc::new(FileCatalogSource::new(path)),
        }
    }
}

impl fmt::Display for CatalogLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches the catalog over HTTP, bypassing caches.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpCatalogSource {
    /// Create a source for the given catalog URL.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    fn no_store_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .client
            .get(self.url.clone())
            .headers(Self::no_store_headers())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        // Parse from text so malformed documents surface as `Parse`
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads the catalog from a local file.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
