//! User gestures and their outcomes.
//!
//! Front ends (the preview server, the CLI) translate their input into a
//! [`Gesture`] and hand it to [`AppContext::dispatch`](crate::context::AppContext::dispatch),
//! which mutates state and reports which view regions to re-render.

use thiserror::Error;
use ylk_core::ProductId;

use crate::cart::CartError;

/// Prompt shown before emptying the cart.
pub const CLEAR_CART_PROMPT: &str = "Clear cart?";

/// Prompt shown before removing a single line.
pub const REMOVE_ITEM_PROMPT: &str = "Remove item?";

/// Message shown by the checkout stub.
pub const CHECKOUT_NOTICE: &str = "Demo checkout — no real payment processed.";

/// A user action on the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// "View" on a product card.
    OpenDetail(ProductId),
    /// "Quick Add" on a product card: first option, quantity 1.
    QuickAdd(ProductId),
    /// Pick an option in the open detail panel.
    SelectOption(usize),
    /// Raw value of the detail panel's quantity input.
    SetQuantity(String),
    /// "Add to cart" in the detail panel.
    ConfirmDetail,
    CloseDetail,
    /// A click somewhere on the detail overlay.
    ClickDetailOverlay(OverlayTarget),
    OpenCart,
    CloseCart,
    Increment(usize),
    Decrement(usize),
    Remove(usize),
    Clear,
    Checkout,
}

impl Gesture {
    /// Confirmation prompt required before this gesture runs, if any.
    #[must_use]
    pub const fn confirmation(&self) -> Option<&'static str> {
        match self {
            Self::Remove(_) => Some(REMOVE_ITEM_PROMPT),
            Self::Clear => Some(CLEAR_CART_PROMPT),
            _ => None,
        }
    }
}

/// Where on the detail overlay a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTarget {
    /// The dimmed area around the panel; closes the panel.
    Backdrop,
    /// Inside the panel content; ignored.
    Content,
}

/// A yes/no prompt shown before destructive actions.
pub trait Confirm {
    /// Ask the user; `true` means go ahead.
    fn confirm(&self, prompt: &str) -> bool;
}

/// An answer collected before the gesture reached the widget, e.g. a
/// browser-side `hx-confirm` or a `--yes` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetAnswer(pub bool);

impl Confirm for PresetAnswer {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, answer = self.0, "confirmation");
        self.0
    }
}

/// View regions that need re-rendering after a gesture.
///
/// The grid is not listed: it only changes when the catalog reloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Refresh {
    pub detail: bool,
    pub drawer: bool,
    pub summary: bool,
}

impl Refresh {
    pub const NONE: Self = Self {
        detail: false,
        drawer: false,
        summary: false,
    };

    pub const DETAIL: Self = Self {
        detail: true,
        ..Self::NONE
    };

    pub const DRAWER: Self = Self {
        drawer: true,
        ..Self::NONE
    };

    /// Drawer and both count badges.
    pub const CART: Self = Self {
        drawer: true,
        summary: true,
        ..Self::NONE
    };

    /// Union of two refresh sets.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        Self {
            detail: self.detail || other.detail,
            drawer: self.drawer || other.drawer,
            summary: self.summary || other.summary,
        }
    }

    /// Whether the cart changed.
    #[must_use]
    pub const fn cart_changed(self) -> bool {
        self.summary
    }
}

/// Result of a dispatched gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub refresh: Refresh,
    /// Message to show the user, if any.
    pub notice: Option<&'static str>,
    /// The user declined a confirmation; nothing changed.
    pub cancelled: bool,
}

impl Outcome {
    #[must_use]
    pub const fn refresh(refresh: Refresh) -> Self {
        Self {
            refresh,
            notice: None,
            cancelled: false,
        }
    }

    #[must_use]
    pub const fn unchanged() -> Self {
        Self::refresh(Refresh::NONE)
    }

    #[must_use]
    pub const fn cancelled() -> Self {
        Self {
            refresh: Refresh::NONE,
            notice: None,
            cancelled: true,
        }
    }

    #[must_use]
    pub const fn notice(message: &'static str) -> Self {
        Self {
            refresh: Refresh::NONE,
            notice: Some(message),
            cancelled: false,
        }
    }
}

/// Errors from dispatching a gesture.
#[derive(Debug, Error)]
pub enum InteractionError {
    /// The product is not in the current catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A detail-panel gesture arrived while no panel is open.
    #[error("no product detail panel is open")]
    NoDetailOpen,

    /// The open product has no option at this position.
    #[error("no option at index {0}")]
    OptionNotFound(usize),

    /// A cart mutation failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}
