//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::StorefrontConfig;
use crate::context::AppContext;
use crate::render::HtmlRenderer;
use crate::storage::LocalStorage;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The widget context sits behind
/// an async mutex so the catalog reloader can share it with the handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    context: Arc<Mutex<AppContext>>,
    storage: Arc<dyn LocalStorage>,
    renderer: HtmlRenderer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `storage` must be the same area the context's cart persists to; it is
    /// also where catalog-changed signals are broadcast.
    pub fn new(
        config: StorefrontConfig,
        context: AppContext,
        storage: Arc<dyn LocalStorage>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                context: Arc::new(Mutex::new(context)),
                storage,
                renderer: HtmlRenderer,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The widget context.
    #[must_use]
    pub fn context(&self) -> &Mutex<AppContext> {
        &self.inner.context
    }

    /// A shared handle to the widget context, for background tasks.
    #[must_use]
    pub fn shared_context(&self) -> Arc<Mutex<AppContext>> {
        Arc::clone(&self.inner.context)
    }

    /// The storage area backing the cart.
    #[must_use]
    pub fn storage(&self) -> &dyn LocalStorage {
        self.inner.storage.as_ref()
    }

    #[must_use]
    pub fn renderer(&self) -> &HtmlRenderer {
        &self.inner.renderer
    }
}
