//! Application context.
//!
//! [`AppContext`] owns all widget state: the catalog, the cart, the open detail
//! panel and the drawer visibility. Front ends pass it to the view projections
//! and dispatch gestures into it; there is no ambient global state.

use std::borrow::Cow;
use std::sync::Arc;

use ylk_core::{CartLineItem, Price, Product, ProductOption};

use crate::cart::CartStore;
use crate::catalog::{CatalogError, CatalogSource, CatalogStore};
use crate::interaction::{
    CHECKOUT_NOTICE, Confirm, Gesture, InteractionError, Outcome, OverlayTarget, Refresh,
};
use crate::storage::LocalStorage;
use crate::view::{self, PageView};

/// State of the product detail panel while it is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    product: Product,
    selected: usize,
    quantity: u32,
}

impl DetailPanel {
    /// Open a panel with the first option selected and quantity 1.
    #[must_use]
    pub const fn open(product: Product) -> Self {
        Self {
            product,
            selected: 0,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Options offered in the panel (a synthetic default when the product has none).
    #[must_use]
    pub fn options(&self) -> Cow<'_, [ProductOption]> {
        self.product.effective_options()
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn selected_option(&self) -> ProductOption {
        self.options()
            .get(self.selected)
            .cloned()
            .unwrap_or_else(|| self.product.first_option())
    }

    /// Select the option at `index`.
    ///
    /// # Errors
    ///
    /// Returns `InteractionError::OptionNotFound` if there is no such option;
    /// the previous selection is kept.
    pub fn select(&mut self, index: usize) -> Result<(), InteractionError> {
        if index >= self.options().len() {
            return Err(InteractionError::OptionNotFound(index));
        }
        self.selected = index;
        Ok(())
    }

    /// Apply the raw quantity input. Anything that is not a positive whole
    /// number counts as 1.
    pub fn set_quantity_input(&mut self, raw: &str) {
        self.quantity = raw.trim().parse::<u32>().ok().filter(|q| *q >= 1).unwrap_or(1);
    }

    /// Live price: selected option price × quantity, `None` on overflow.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        Price::usd(self.selected_option().price).checked_times(self.quantity)
    }

    /// The entry this panel would add to the cart.
    #[must_use]
    pub fn line_item(&self) -> CartLineItem {
        CartLineItem::from_option(&self.product, &self.selected_option(), self.quantity)
    }
}

/// All state of one widget instance.
#[derive(Debug)]
pub struct AppContext {
    catalog: CatalogStore,
    cart: CartStore,
    detail: Option<DetailPanel>,
    drawer_open: bool,
}

impl AppContext {
    #[must_use]
    pub const fn new(catalog: CatalogStore, cart: CartStore) -> Self {
        Self {
            catalog,
            cart,
            detail: None,
            drawer_open: false,
        }
    }

    /// Build a context over a catalog source and a storage area, rehydrating
    /// the cart. The catalog starts empty until [`load_catalog`](Self::load_catalog).
    pub fn open(source: Arc<dyn CatalogSource>, storage: Arc<dyn LocalStorage>) -> Self {
        Self::new(CatalogStore::new(source), CartStore::open(storage))
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn detail(&self) -> Option<&DetailPanel> {
        self.detail.as_ref()
    }

    #[must_use]
    pub const fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    /// Re-read the persisted cart, picking up writes from other processes.
    pub fn reload_cart(&mut self) {
        self.cart.reload();
    }

    /// Project the full page.
    #[must_use]
    pub fn view(&self) -> PageView {
        view::project_page(self)
    }

    /// Load (or reload) the catalog. The grid needs re-rendering afterwards
    /// whether or not the load succeeded.
    ///
    /// # Errors
    ///
    /// Returns the `CatalogError` recorded by the catalog store.
    pub async fn load_catalog(&mut self) -> Result<usize, CatalogError> {
        self.catalog.load().await.map(<[Product]>::len)
    }

    /// Record a catalog fetched outside this context (see
    /// [`crate::signal::spawn_catalog_reloader`]).
    ///
    /// # Errors
    ///
    /// Passes a failed `result` through after recording it.
    pub fn apply_catalog(
        &mut self,
        result: Result<Vec<Product>, CatalogError>,
    ) -> Result<usize, CatalogError> {
        self.catalog.apply(result).map(<[Product]>::len)
    }

    /// Apply a user gesture.
    ///
    /// Destructive gestures (`Remove`, `Clear`) ask `confirm` first and leave
    /// state unchanged when declined.
    ///
    /// # Errors
    ///
    /// Returns `InteractionError` for unknown products, lines or options, for
    /// detail gestures with no panel open, and for cart persistence failures.
    pub fn dispatch(
        &mut self,
        gesture: Gesture,
        confirm: &dyn Confirm,
    ) -> Result<Outcome, InteractionError> {
        tracing::debug!(?gesture, "dispatch");

        if let Some(prompt) = gesture.confirmation() {
            if let Gesture::Remove(index) = gesture {
                // Do not prompt for a line that does not exist
                if index >= self.cart.items().len() {
                    return Err(crate::cart::CartError::LineNotFound(index).into());
                }
            }
            if !confirm.confirm(prompt) {
                tracing::debug!(prompt, "confirmation declined");
                return Ok(Outcome::cancelled());
            }
        }

        match gesture {
            Gesture::OpenDetail(id) => {
                let product = self
                    .catalog
                    .find_by_id(&id)
                    .ok_or(InteractionError::UnknownProduct(id))?;
                self.detail = Some(DetailPanel::open(product.clone()));
                Ok(Outcome::refresh(Refresh::DETAIL))
            }
            Gesture::QuickAdd(id) => {
                let product = self
                    .catalog
                    .find_by_id(&id)
                    .ok_or(InteractionError::UnknownProduct(id))?;
                let entry = CartLineItem::from_option(product, &product.first_option(), 1);
                self.cart.add_item(entry)?;
                Ok(Outcome::refresh(Refresh::CART))
            }
            Gesture::SelectOption(index) => {
                self.detail_mut()?.select(index)?;
                Ok(Outcome::refresh(Refresh::DETAIL))
            }
            Gesture::SetQuantity(raw) => {
                self.detail_mut()?.set_quantity_input(&raw);
                Ok(Outcome::refresh(Refresh::DETAIL))
            }
            Gesture::ConfirmDetail => {
                let panel = self.detail.as_ref().ok_or(InteractionError::NoDetailOpen)?;
                self.cart.add_item(panel.line_item())?;
                self.detail = None;
                Ok(Outcome::refresh(Refresh::DETAIL.and(Refresh::CART)))
            }
            Gesture::CloseDetail | Gesture::ClickDetailOverlay(OverlayTarget::Backdrop) => {
                self.detail = None;
                Ok(Outcome::refresh(Refresh::DETAIL))
            }
            Gesture::ClickDetailOverlay(OverlayTarget::Content) => Ok(Outcome::unchanged()),
            Gesture::OpenCart => {
                self.drawer_open = true;
                Ok(Outcome::refresh(Refresh::DRAWER))
            }
            Gesture::CloseCart => {
                self.drawer_open = false;
                Ok(Outcome::refresh(Refresh::DRAWER))
            }
            Gesture::Increment(index) => {
                self.cart.increment_qty(index)?;
                Ok(Outcome::refresh(Refresh::CART))
            }
            Gesture::Decrement(index) => {
                self.cart.decrement_qty(index)?;
                Ok(Outcome::refresh(Refresh::CART))
            }
            Gesture::Remove(index) => {
                self.cart.remove_item(index)?;
                Ok(Outcome::refresh(Refresh::CART))
            }
            Gesture::Clear => {
                self.cart.clear()?;
                Ok(Outcome::refresh(Refresh::CART))
            }
            Gesture::Checkout => {
                tracing::info!(
                    items = self.cart.total_count(),
                    subtotal = %self.cart.subtotal_display(),
                    "demo checkout"
                );
                Ok(Outcome::notice(CHECKOUT_NOTICE))
            }
        }
    }

    fn detail_mut(&mut self) -> Result<&mut DetailPanel, InteractionError> {
        self.detail.as_mut().ok_or(InteractionError::NoDetailOpen)
    }
}
