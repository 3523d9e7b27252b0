//! Cart store.
//!
//! Holds the ordered cart lines and owns every cart mutation. The store is
//! write-through: each mutating call serializes the full line collection to
//! local storage under [`CART_KEY`] and only then updates the in-memory
//! lines, so a failed call leaves the cart as it was.
//!
//! # Invariants
//!
//! - Every line has `qty >= 1`; a line that would drop to zero is removed.
//! - `(product_id, option)` is unique; adding a matching entry increases the
//!   existing line's quantity.
//! - The subtotal is representable; a mutation that would overflow it is
//!   rejected before anything changes.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use ylk_core::{CartLineItem, Price};

use crate::storage::{LocalStorage, StorageError};

/// Storage key of the persisted cart. The `v1` suffix is the schema version.
pub const CART_KEY: &str = "ylk_cart_v1";

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No line at the given position.
    #[error("no cart line at index {0}")]
    LineNotFound(usize),

    /// Entries must carry a positive quantity.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The subtotal would no longer fit a `Decimal`. Nothing was changed.
    #[error("cart total would overflow")]
    Overflow,

    /// Persisting the cart failed. The in-memory cart is unchanged.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),

    /// Serializing the cart failed.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The shopping cart, rehydrated from and persisted to local storage.
#[derive(Debug)]
pub struct CartStore {
    storage: Arc<dyn LocalStorage>,
    items: Vec<CartLineItem>,
}

impl CartStore {
    /// Open the cart persisted in `storage`.
    ///
    /// Never fails: missing, unreadable or malformed data yields an empty
    /// cart. Malformed data is left in storage until the next write.
    pub fn open(storage: Arc<dyn LocalStorage>) -> Self {
        let items = load(storage.as_ref());
        Self { storage, items }
    }

    /// Re-read the persisted cart, replacing the in-memory lines.
    pub fn reload(&mut self) {
        self.items = load(self.storage.as_ref());
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an entry, merging with an existing `(product, option)` line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity or
    /// `CartError::Overflow` if the subtotal would overflow (nothing is
    /// changed in either case), or `CartError::Storage` if persisting fails.
    pub fn add_item(&mut self, entry: CartLineItem) -> Result<(), CartError> {
        if entry.qty == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let mut items = self.items.clone();
        if let Some(existing) = items
            .iter_mut()
            .find(|line| line.matches(&entry.product_id, &entry.option))
        {
            existing.qty = existing.qty.saturating_add(entry.qty);
            tracing::debug!(
                product_id = %entry.product_id,
                option = %entry.option,
                qty = existing.qty,
                "merged cart line"
            );
        } else {
            tracing::debug!(
                product_id = %entry.product_id,
                option = %entry.option,
                qty = entry.qty,
                "added cart line"
            );
            items.push(entry);
        }
        self.commit(items)
    }

    /// Increase a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound`, `CartError::Overflow` or
    /// `CartError::Storage`.
    pub fn increment_qty(&mut self, index: usize) -> Result<(), CartError> {
        let mut items = self.items.clone();
        let line = items
            .get_mut(index)
            .ok_or(CartError::LineNotFound(index))?;
        line.qty = line.qty.saturating_add(1);
        self.commit(items)
    }

    /// Decrease a line's quantity by one, removing the line at zero.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` or `CartError::Storage`.
    pub fn decrement_qty(&mut self, index: usize) -> Result<(), CartError> {
        let mut items = self.items.clone();
        let line = items
            .get_mut(index)
            .ok_or(CartError::LineNotFound(index))?;
        line.qty = line.qty.saturating_sub(1);
        if line.qty == 0 {
            items.remove(index);
        }
        self.commit(items)
    }

    /// Delete a line regardless of its quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` or `CartError::Storage`.
    pub fn remove_item(&mut self, index: usize) -> Result<CartLineItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::LineNotFound(index));
        }
        let mut items = self.items.clone();
        let removed = items.remove(index);
        self.commit(items)?;
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if persisting fails.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(Vec::new())
    }

    /// Sum of `unit_price × qty` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        // Every commit and load checks the sum, so this never saturates.
        ylk_core::subtotal(&self.items).unwrap_or(Decimal::MAX)
    }

    /// Subtotal formatted for display (e.g., "$15.00").
    #[must_use]
    pub fn subtotal_display(&self) -> String {
        Price::usd(self.subtotal()).to_string()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        ylk_core::total_count(&self.items)
    }

    /// Persist `items` and make them the current lines.
    fn commit(&mut self, items: Vec<CartLineItem>) -> Result<(), CartError> {
        if ylk_core::subtotal(&items).is_none() {
            tracing::warn!(lines = items.len(), "rejected cart change: subtotal overflow");
            return Err(CartError::Overflow);
        }
        let json = serde_json::to_string(&items)?;
        self.storage.set_item(CART_KEY, &json)?;
        self.items = items;
        Ok(())
    }
}

/// Read the persisted cart, degrading to empty on any failure.
fn load(storage: &dyn LocalStorage) -> Vec<CartLineItem> {
    let raw = match storage.get_item(CART_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted cart");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
        Ok(mut items) => {
            let before = items.len();
            items.retain(|line| line.qty > 0 && !line.unit_price.is_sign_negative());
            if items.len() != before {
                tracing::warn!(
                    dropped = before - items.len(),
                    "dropped cart lines with zero quantity or negative price"
                );
            }
            if ylk_core::subtotal(&items).is_none() {
                tracing::warn!("persisted cart subtotal overflows");
                return Vec::new();
            }
            items
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse cart");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use ylk_core::ProductId;

    fn entry(product: &str, option: &str, price: i64, qty: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(product),
            title: format!("Product {product}"),
            image: None,
            option: option.to_string(),
            unit_price: Decimal::new(price, 0),
            qty,
        }
    }

    fn empty_store() -> (MemoryStorage, CartStore) {
        let storage = MemoryStorage::new();
        let store = CartStore::open(Arc::new(storage.clone()));
        (storage, store)
    }

    fn persisted(storage: &MemoryStorage) -> Vec<CartLineItem> {
        let raw = storage.get_item(CART_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_same_pair_accumulates() {
        let (_, mut cart) = empty_store();
        cart.add_item(entry("A", "Small", 5, 1)).unwrap();
        cart.add_item(entry("A", "Small", 5, 2)).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].qty, 3);
        assert_eq!(cart.subtotal(), Decimal::new(15, 0));
        assert_eq!(cart.subtotal_display(), "$15.00");
    }

    #[test]
    fn test_different_option_is_separate_line() {
        let (_, mut cart) = empty_store();
        cart.add_item(entry("A", "Small", 5, 1)).unwrap();
        cart.add_item(entry("A", "Large", 7, 1)).unwrap();
        cart.add_item(entry("B", "Small", 5, 1)).unwrap();
        assert_eq!(cart.items().len(), 3);
        assert_eq!(cart.total_count(), 3);
    }

    #[test]
    fn test_merge_keeps_original_snapshot_price() {
        let (_, mut cart) = empty_store();
        cart.add_item(entry("A", "Small", 5, 1)).unwrap();
        cart.add_item(entry("A", "Small", 9, 1)).unwrap();
        assert_eq!(cart.items()[0].unit_price, Decimal::new(5, 0));
        assert_eq!(cart.subtotal(), Decimal::new(10, 0));
    }

    #[test]
    fn test_zero_quantity_entry_rejected() {
        let (storage, mut cart) = empty_store();
        let result = cart.add_item(entry("A", "Small", 5, 0));
        assert!(matches!(result, Err(CartError::InvalidQuantity)));
        assert!(cart.is_empty());
        assert_eq!(storage.get_item(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_decrement_single_removes_line() {
        let (storage, mut cart) = empty_store();
        cart.add_item(entry("A", "Small", 5, 1)).unwrap();
        cart.decrement_qty(0).unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal_display(), "$0.00");
        assert!(persisted(&storage).is_empty());
    }

    #[test]
    fn test_decrement_until_removed() {
        let (storage, mut cart) = empty_store();
        cart.add_item(entry("A", "Small", 5, 3)).unwrap();
        cart.add_item(entry("B", "Small", 2, 1)).unwrap();

        cart.decrement_qty(0).unwrap();
        cart.decrement_qty(0).unwrap();
        assert_eq!(cart.items()[0].qty, 1);
        cart.decrement_qty(0).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id, ProductId::new("B"));
        assert!(persisted(&storage).iter().all(|line| line.qty > 0));
    }

    #[test]
    fn test_increment() {
        let (storage, mut cart) = empty_store();
        cart.add_item(entry("A", "Small", 5, 1)).unwrap();
        cart.increment_qty(0).unwrap();
        assert_eq!(cart.items()[0].qty, 2);
        assert_eq!(persisted(&storage)[0].qty, 2);
    }

    #[test]
    fn test_out_of_range_index() {
        let (_, mut cart) = empty_store();
        assert!(matches!(cart.increment_qty(0), Err(CartError::LineNotFound(0))));
        assert!(matches!(cart.decrement_qty(4), Err(CartError::LineNotFound(4))));
        assert!(matches!(cart.remove_item(1), Err(CartError::LineNotFound(1))));
    }

    #[test]
    fn test_remove_and_clear() {
        let (storage, mut cart) = empty_store();
        cart.add_item(entry("A", "Small", 5, 4)).unwrap();
        cart.add_item(entry("B", "Small", 3, 1)).unwrap();

        let removed = cart.remove_item(0).unwrap();
        assert_eq!(removed.qty, 4);
        assert_eq!(cart.items().len(), 1);

        cart.clear().unwrap();
        assert!(cart.is_empty());
        assert!(persisted(&storage).is_empty());
    }

    #[test]
    fn test_subtotal_tracks_mutations() {
        let (_, mut cart) = empty_store();
        cart.add_item(entry("A", "Small", 5, 2)).unwrap();
        cart.add_item(entry("B", "Large", 12, 1)).unwrap();
        cart.increment_qty(1).unwrap();
        cart.decrement_qty(0).unwrap();

        let expected: Decimal = cart
            .items()
            .iter()
            .map(|line| line.line_total().unwrap())
            .sum();
        assert_eq!(cart.subtotal(), expected);
        assert_eq!(cart.subtotal(), Decimal::new(29, 0));
        assert_eq!(cart.total_count(), 3);
    }

    #[test]
    fn test_roundtrip_through_storage() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(Arc::new(storage.clone()));
        cart.add_item(entry("A", "Small", 5, 2)).unwrap();
        cart.add_item(CartLineItem {
            image: Some("mug.png".to_string()),
            unit_price: Decimal::new(1299, 2),
            ..entry("B", "Default", 0, 1)
        })
        .unwrap();

        let reopened = CartStore::open(Arc::new(storage.handle()));
        assert_eq!(reopened.items(), cart.items());
    }

    #[test]
    fn test_corrupted_data_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_KEY, "{not json").unwrap();

        let cart = CartStore::open(Arc::new(storage.clone()));
        assert!(cart.is_empty());
        // Left untouched until the next successful write
        assert_eq!(storage.get_item(CART_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_KEY, r#"{"items": []}"#).unwrap();
        assert!(CartStore::open(Arc::new(storage)).is_empty());
    }

    #[test]
    fn test_corrupted_data_replaced_on_next_write() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_KEY, "garbage").unwrap();
        let mut cart = CartStore::open(Arc::new(storage.clone()));
        cart.add_item(entry("A", "Small", 5, 1)).unwrap();
        assert_eq!(persisted(&storage).len(), 1);
    }

    #[test]
    fn test_zero_quantity_rows_dropped_on_load() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                CART_KEY,
                r#"[{"productId":"A","title":"A","option":"S","unitPrice":5,"qty":0},
                    {"productId":"B","title":"B","option":"S","unitPrice":2,"qty":2}]"#,
            )
            .unwrap();
        let cart = CartStore::open(Arc::new(storage));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_count(), 2);
    }

    #[test]
    fn test_overflowing_add_is_rejected() {
        let (storage, mut cart) = empty_store();
        let huge = CartLineItem {
            unit_price: Decimal::from_str_exact("50000000000000000000000000000").unwrap(),
            ..entry("A", "Small", 0, 1)
        };
        cart.add_item(huge.clone()).unwrap();

        let result = cart.add_item(huge);
        assert!(matches!(result, Err(CartError::Overflow)));
        assert_eq!(cart.items()[0].qty, 1);
        assert_eq!(persisted(&storage)[0].qty, 1);

        let reopened = CartStore::open(Arc::new(storage.handle()));
        assert_eq!(reopened.total_count(), 1);
        assert!(reopened.subtotal() > Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_increment_is_rejected() {
        let (_, mut cart) = empty_store();
        cart.add_item(CartLineItem {
            unit_price: Decimal::MAX,
            ..entry("A", "Small", 0, 1)
        })
        .unwrap();
        assert!(matches!(cart.increment_qty(0), Err(CartError::Overflow)));
        assert_eq!(cart.total_count(), 1);
        assert_eq!(cart.subtotal(), Decimal::MAX);
    }

    #[test]
    fn test_overflowing_stored_cart_loads_empty() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                CART_KEY,
                r#"[{"productId":"A","title":"A","option":"S","unitPrice":"50000000000000000000000000000","qty":2}]"#,
            )
            .unwrap();
        let cart = CartStore::open(Arc::new(storage));
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal_display(), "$0.00");
    }

    #[test]
    fn test_negative_price_rows_dropped_on_load() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                CART_KEY,
                r#"[{"productId":"A","title":"A","option":"S","unitPrice":-5,"qty":1},
                    {"productId":"B","title":"B","option":"S","unitPrice":2,"qty":1}]"#,
            )
            .unwrap();
        let cart = CartStore::open(Arc::new(storage));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.subtotal(), Decimal::new(2, 0));
    }

    #[test]
    fn test_failed_write_leaves_cart_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let storage = FileStorage::open(&data).unwrap();
        let mut cart = CartStore::open(Arc::new(storage));
        cart.add_item(entry("A", "Small", 5, 1)).unwrap();

        std::fs::remove_dir_all(&data).unwrap();
        let result = cart.add_item(entry("B", "Small", 3, 1));
        assert!(matches!(result, Err(CartError::Storage(_))));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.subtotal(), Decimal::new(5, 0));
    }

    #[test]
    fn test_reload_picks_up_other_writer() {
        let storage = MemoryStorage::new();
        let mut tab_a = CartStore::open(Arc::new(storage.clone()));
        let mut tab_b = CartStore::open(Arc::new(storage.handle()));

        tab_a.add_item(entry("A", "Small", 5, 1)).unwrap();
        assert!(tab_b.is_empty());
        tab_b.reload();
        assert_eq!(tab_b.total_count(), 1);
    }
}
