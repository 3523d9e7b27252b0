//! Catalog store.
//!
//! Holds the product list loaded from the static catalog document. The list is
//! never mutated after a load; a reload replaces it wholesale.
//!
//! # Failure handling
//!
//! A failed load (transport error, non-success status, malformed document)
//! leaves the store empty and records a hint for the grid to show. Loads are
//! never retried automatically.

mod source;

pub use source::{CatalogLocation, CatalogSource, FileCatalogSource, HttpCatalogSource};

use std::sync::Arc;

use thiserror::Error;
use ylk_core::{Product, ProductError, ProductId};

/// Hint shown in place of the grid when the catalog could not be loaded.
pub const LOAD_FAILED_HINT: &str =
    "Could not load products. Check products.json or run from a local server.";

/// Hint shown when the catalog loaded but lists no products.
pub const EMPTY_CATALOG_HINT: &str = "No products available yet.";

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("catalog request failed with status {0}")]
    Status(u16),

    /// Reading a local catalog file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A product failed validation.
    #[error("invalid catalog: {0}")]
    Invalid(#[from] ProductError),

    /// The catalog location could not be understood.
    #[error("invalid catalog location: {0}")]
    Location(String),
}

/// Fetch from `source` and check every product.
///
/// # Errors
///
/// Returns the fetch error, or `CatalogError::Invalid` for the first product
/// that fails validation.
pub async fn fetch_validated(source: &dyn CatalogSource) -> Result<Vec<Product>, CatalogError> {
    let products = source.fetch().await?;
    products.iter().try_for_each(Product::validate)?;
    Ok(products)
}

/// Outcome of the most recent load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    /// No load has completed yet.
    Pending,
    Loaded,
    Failed,
}

/// The in-memory product catalog.
#[derive(Debug)]
pub struct CatalogStore {
    source: Arc<dyn CatalogSource>,
    products: Vec<Product>,
    status: CatalogStatus,
}

impl CatalogStore {
    /// Create an empty store that loads from `source`.
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            products: Vec::new(),
            status: CatalogStatus::Pending,
        }
    }

    /// Fetch the catalog and replace the product list.
    ///
    /// On failure the store is emptied and its status becomes
    /// [`CatalogStatus::Failed`].
    ///
    /// # Errors
    ///
    /// Returns the `CatalogError` that caused the failure, after it has been
    /// logged and recorded.
    pub async fn load(&mut self) -> Result<&[Product], CatalogError> {
        let result = fetch_validated(self.source.as_ref()).await;
        self.apply(result)
    }

    /// Record the result of a fetch performed elsewhere.
    ///
    /// # Errors
    ///
    /// Passes a failed `result` through after recording it.
    pub fn apply(
        &mut self,
        result: Result<Vec<Product>, CatalogError>,
    ) -> Result<&[Product], CatalogError> {
        match result {
            Ok(products) => {
                tracing::info!(
                    count = products.len(),
                    source = %self.source.describe(),
                    "catalog loaded"
                );
                self.products = products;
                self.status = CatalogStatus::Loaded;
                Ok(&self.products)
            }
            Err(e) => {
                tracing::error!(error = %e, source = %self.source.describe(), "could not load products");
                self.products.clear();
                self.status = CatalogStatus::Failed;
                Err(e)
            }
        }
    }

    /// Source this store loads from.
    #[must_use]
    pub fn source(&self) -> Arc<dyn CatalogSource> {
        Arc::clone(&self.source)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn status(&self) -> CatalogStatus {
        self.status
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == *id)
    }

    /// Message to show instead of the grid, if any.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self.status {
            CatalogStatus::Failed => Some(LOAD_FAILED_HINT),
            CatalogStatus::Loaded if self.products.is_empty() => Some(EMPTY_CATALOG_HINT),
            CatalogStatus::Loaded | CatalogStatus::Pending => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Source returning queued results, one per fetch.
    #[derive(Debug, Default)]
    pub(crate) struct StubSource {
        results: Mutex<Vec<Result<Vec<Product>, CatalogError>>>,
    }

    impl StubSource {
        pub(crate) fn with(results: Vec<Result<Vec<Product>, CatalogError>>) -> Arc<Self> {
            let mut results = results;
            results.reverse();
            Arc::new(Self {
                results: Mutex::new(results),
            })
        }
    }

    #[async_trait]
    impl CatalogSource for StubSource {
        async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
            self.results
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .pop()
                .unwrap_or(Err(CatalogError::Status(503)))
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    pub(crate) fn product(id: &str, options: &[(&str, i64)]) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: format!("About {id}"),
            image: None,
            options: options
                .iter()
                .map(|(name, price)| ylk_core::ProductOption {
                    name: (*name).to_string(),
                    price: rust_decimal::Decimal::new(*price, 0),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_load_success() {
        let source = StubSource::with(vec![Ok(vec![product("A", &[("Small", 5)])])]);
        let mut store = CatalogStore::new(source);
        assert_eq!(store.status(), CatalogStatus::Pending);

        let products = store.load().await.map(<[Product]>::len);
        assert_eq!(products.ok(), Some(1));
        assert_eq!(store.status(), CatalogStatus::Loaded);
        assert!(store.hint().is_none());
        assert!(store.find_by_id(&ProductId::new("A")).is_some());
        assert!(store.find_by_id(&ProductId::new("Z")).is_none());
    }

    #[tokio::test]
    async fn test_failed_load_empties_store_and_sets_hint() {
        let source = StubSource::with(vec![
            Ok(vec![product("A", &[])]),
            Err(CatalogError::Status(404)),
        ]);
        let mut store = CatalogStore::new(source);
        assert!(store.load().await.is_ok());

        let result = store.load().await;
        assert!(matches!(result, Err(CatalogError::Status(404))));
        assert!(store.products().is_empty());
        assert_eq!(store.status(), CatalogStatus::Failed);
        assert_eq!(store.hint(), Some(LOAD_FAILED_HINT));
    }

    #[tokio::test]
    async fn test_empty_catalog_hint() {
        let mut store = CatalogStore::new(StubSource::with(vec![Ok(vec![])]));
        assert!(store.load().await.is_ok());
        assert_eq!(store.hint(), Some(EMPTY_CATALOG_HINT));
    }

    #[tokio::test]
    async fn test_invalid_product_fails_load() {
        let mut store = CatalogStore::new(StubSource::with(vec![Ok(vec![product(
            "A",
            &[("Small", -2)],
        )])]));
        assert!(matches!(store.load().await, Err(CatalogError::Invalid(_))));
        assert_eq!(store.status(), CatalogStatus::Failed);
    }

    #[tokio::test]
    async fn test_reload_replaces_products() {
        let source = StubSource::with(vec![
            Ok(vec![product("A", &[])]),
            Ok(vec![product("B", &[]), product("C", &[])]),
        ]);
        let mut store = CatalogStore::new(source);
        assert!(store.load().await.is_ok());
        assert!(store.load().await.is_ok());
        assert_eq!(store.products().len(), 2);
        assert!(store.find_by_id(&ProductId::new("A")).is_none());
    }
}
