//! Catalog products and their purchase options.
//!
//! Products are read-only: they come from the static catalog document and are
//! never mutated after load.

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;

/// Display asset used when a product has no image of its own.
pub const DEFAULT_IMAGE: &str = "logo.png";

/// Name of the synthetic option used for products without options.
pub const DEFAULT_OPTION_NAME: &str = "Default";

/// Highest unit price a catalog may list (one trillion).
///
/// Keeps `price × qty` and cart subtotals far below `Decimal::MAX` for any
/// `u32` quantity.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// A catalog entry that fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("product {product}: option '{option}' has a negative price")]
    NegativePrice { product: ProductId, option: String },

    #[error("product {product}: option '{option}' is priced above {max}", max = MAX_UNIT_PRICE)]
    PriceTooLarge { product: ProductId, option: String },
}

/// A named purchasable variant of a product (e.g., size or edition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    /// Unit price; a missing price is treated as zero.
    #[serde(default)]
    pub price: Decimal,
}

impl ProductOption {
    /// The synthetic option offered when a product lists none.
    #[must_use]
    pub fn synthetic_default() -> Self {
        Self {
            name: DEFAULT_OPTION_NAME.to_string(),
            price: Decimal::ZERO,
        }
    }

    /// Label used on option pickers (e.g., "Small — $5.00").
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} — {}", self.name, Price::usd(self.price))
    }
}

/// A product from the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
}

impl Product {
    /// Image reference, falling back to [`DEFAULT_IMAGE`].
    #[must_use]
    pub fn image_or_default(&self) -> &str {
        self.image
            .as_deref()
            .filter(|image| !image.is_empty())
            .unwrap_or(DEFAULT_IMAGE)
    }

    /// The options a shopper can choose from.
    ///
    /// Products without options expose a single synthetic
    /// `Default` option priced at zero.
    #[must_use]
    pub fn effective_options(&self) -> Cow<'_, [ProductOption]> {
        if self.options.is_empty() {
            Cow::Owned(vec![ProductOption::synthetic_default()])
        } else {
            Cow::Borrowed(&self.options)
        }
    }

    /// The option picked by quick add and preselected in the detail panel.
    #[must_use]
    pub fn first_option(&self) -> ProductOption {
        self.options
            .first()
            .cloned()
            .unwrap_or_else(ProductOption::synthetic_default)
    }

    /// Check catalog-level constraints on this product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NegativePrice` if any option is priced below
    /// zero, or `ProductError::PriceTooLarge` above [`MAX_UNIT_PRICE`].
    pub fn validate(&self) -> Result<(), ProductError> {
        for option in &self.options {
            if option.price < Decimal::ZERO {
                return Err(ProductError::NegativePrice {
                    product: self.id.clone(),
                    option: option.name.clone(),
                });
            }
            if option.price > MAX_UNIT_PRICE {
                return Err(ProductError::PriceTooLarge {
                    product: self.id.clone(),
                    option: option.name.clone(),
                });
            }
        }
        Ok(())
    }
}
