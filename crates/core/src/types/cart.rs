//! Cart line items and derived cart totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::{Product, ProductOption};

/// One entry in the cart, identified by product and chosen option.
///
/// The line keeps its own copy of the title, image and unit price taken at
/// the moment the shopper picked it, so later catalog changes (or the product
/// disappearing from the catalog) do not affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Chosen option name. Lines are matched on the name, not the price.
    pub option: String,
    /// Snapshot price; serialized as a JSON number like earlier widget versions.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub unit_price: Decimal,
    pub qty: u32,
}

impl CartLineItem {
    /// Snapshot a product option into a new line item.
    #[must_use]
    pub fn from_option(product: &Product, option: &ProductOption, qty: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            image: product.image.clone(),
            option: option.name.clone(),
            unit_price: option.price,
            qty,
        }
    }

    /// Whether this line is the same `(product, option)` pair.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, option: &str) -> bool {
        self.product_id == *product_id && self.option == option
    }

    /// `unit_price × qty`, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.qty))
    }

    #[must_use]
    pub fn unit_price_display(&self) -> Price {
        Price::usd(self.unit_price)
    }
}

/// Sum of `unit_price × qty` over all lines, or `None` on overflow.
#[must_use]
pub fn subtotal(items: &[CartLineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.line_total()?))
}

/// Sum of quantities over all lines, saturating at `u32::MAX`.
#[must_use]
pub fn total_count(items: &[CartLineItem]) -> u32 {
    items
        .iter()
        .fold(0, |count: u32, item| count.saturating_add(item.qty))
}
