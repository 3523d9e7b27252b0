//! Catalog-changed broadcast.
//!
//! One context tells the others to refetch the catalog by writing a sentinel
//! key to the shared storage area. The value carries no meaning; a fresh one is
//! written every time so each broadcast is a change.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::catalog::CatalogError;
use crate::context::AppContext;
use crate::storage::{LocalStorage, StorageError, StorageEvent, StorageEvents};

/// Storage key whose change means "catalog changed, reload it".
pub const CATALOG_SIGNAL_KEY: &str = "products_updated_signal";

/// Tell every other context on this storage area to reload its catalog.
///
/// # Errors
///
/// Returns `StorageError` if the sentinel cannot be written.
pub fn notify_catalog_changed(storage: &dyn LocalStorage) -> Result<(), StorageError> {
    let token = uuid::Uuid::new_v4().to_string();
    storage.set_item(CATALOG_SIGNAL_KEY, &token)?;
    tracing::info!(%token, "catalog change broadcast");
    Ok(())
}

/// Whether a storage event is the catalog-changed signal.
#[must_use]
pub fn is_catalog_signal(event: &StorageEvent) -> bool {
    event.key == CATALOG_SIGNAL_KEY
}

/// Reload the shared context's catalog whenever another context signals.
///
/// The fetch runs without holding the context lock, so gestures keep working
/// while it is in flight. The task ends when the storage area is dropped.
pub fn spawn_catalog_reloader(
    context: Arc<Mutex<AppContext>>,
    mut events: StorageEvents,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if !is_catalog_signal(&event) {
                continue;
            }
            tracing::info!("catalog change signal received, reloading");

            let source = context.lock().await.catalog().source();
            let result = crate::catalog::fetch_validated(source.as_ref()).await;
            let applied: Result<usize, CatalogError> = context.lock().await.apply_catalog(result);
            if let Ok(count) = applied {
                tracing::debug!(count, "catalog reloaded after signal");
            }
        }
        tracing::debug!("catalog reloader stopped");
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::time::Duration;

    use ylk_core::ProductId;

    use crate::catalog::tests::{StubSource, product};
    use crate::storage::MemoryStorage;

    #[test]
    fn test_notify_writes_fresh_value() {
        let storage = MemoryStorage::new();
        notify_catalog_changed(&storage).unwrap();
        let first = storage.get_item(CATALOG_SIGNAL_KEY).unwrap().unwrap();
        notify_catalog_changed(&storage).unwrap();
        let second = storage.get_item(CATALOG_SIGNAL_KEY).unwrap().unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_other_context_reloads_catalog() {
        let storage = MemoryStorage::new();
        let source = StubSource::with(vec![
            Ok(vec![product("A", &[])]),
            Ok(vec![product("A", &[]), product("NEW", &[])]),
        ]);

        let tab_b_storage = storage.handle();
        let events = tab_b_storage.subscribe();
        let mut ctx = AppContext::open(source, Arc::new(tab_b_storage));
        ctx.load_catalog().await.unwrap();
        let tab_b = Arc::new(Mutex::new(ctx));
        let reloader = spawn_catalog_reloader(Arc::clone(&tab_b), events);

        // Unrelated keys do not trigger a reload
        storage.set_item("something_else", "1").unwrap();
        notify_catalog_changed(&storage).unwrap();

        let mut reloaded = false;
        for _ in 0..100 {
            if tab_b
                .lock()
                .await
                .catalog()
                .find_by_id(&ProductId::new("NEW"))
                .is_some()
            {
                reloaded = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(reloaded);
        reloader.abort();
    }

    #[tokio::test]
    async fn test_own_signal_does_not_reload() {
        let storage = MemoryStorage::new();
        let source = StubSource::with(vec![Ok(vec![product("A", &[])])]);
        let events = storage.subscribe();
        let mut ctx = AppContext::open(source, Arc::new(storage.clone()));
        ctx.load_catalog().await.unwrap();
        let shared = Arc::new(Mutex::new(ctx));
        let reloader = spawn_catalog_reloader(Arc::clone(&shared), events);

        notify_catalog_changed(&storage).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // A reload would have hit the exhausted stub and failed the catalog
        assert_eq!(shared.lock().await.catalog().products().len(), 1);
        reloader.abort();
    }
}
