//! Declarative views.
//!
//! Pure projections from widget state to view descriptions. Nothing here knows
//! about HTML or terminals; a [`Renderer`](crate::render::Renderer) turns these
//! descriptions into output. Every projection is recomputed in full whenever
//! its region needs refreshing.

use ylk_core::{CartLineItem, DEFAULT_IMAGE, Product, ProductId};

use crate::cart::CartStore;
use crate::catalog::CatalogStore;
use crate::context::{AppContext, DetailPanel};
use crate::interaction::{Gesture, OverlayTarget};

/// Message shown in the drawer when the cart has no lines.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// Detail price label when option price × quantity does not fit a `Decimal`.
pub const PRICE_UNAVAILABLE: &str = "Price unavailable";

/// Something the user can activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordance {
    pub label: String,
    pub gesture: Gesture,
}

impl Affordance {
    fn new(label: impl Into<String>, gesture: Gesture) -> Self {
        Self {
            label: label.into(),
            gesture,
        }
    }

    /// Prompt to show before activating, if the gesture is destructive.
    #[must_use]
    pub const fn confirm_prompt(&self) -> Option<&'static str> {
        self.gesture.confirmation()
    }
}

/// The whole widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub grid: GridView,
    pub detail: Option<DetailView>,
    pub drawer: DrawerView,
    pub summary: SummaryView,
}

/// Product grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub cards: Vec<ProductCard>,
    /// Placeholder text shown instead of cards.
    pub hint: Option<String>,
}

/// One product in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub view: Affordance,
    pub quick_add: Affordance,
}

/// The open product detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub product_id: ProductId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub options: Vec<OptionChoice>,
    pub quantity: u32,
    /// Selected option price × quantity, e.g. "$15.00".
    pub price_label: String,
    pub add: Affordance,
    pub close: Affordance,
    pub backdrop: Affordance,
}

/// One option in the detail panel; exactly one is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionChoice {
    pub index: usize,
    /// e.g. "Small — $5.00"
    pub label: String,
    pub selected: bool,
    pub choose: Affordance,
}

/// Cart drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerView {
    pub open: bool,
    pub lines: Vec<LineView>,
    pub subtotal_label: String,
    /// Shown instead of lines when the cart is empty.
    pub empty_message: Option<&'static str>,
    pub clear: Affordance,
    pub pay: Affordance,
    pub close: Affordance,
}

/// One cart line in the drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub index: usize,
    pub title: String,
    pub image: String,
    /// e.g. "Small • $5.00 × 3"
    pub meta: String,
    pub decrement: Affordance,
    pub increment: Affordance,
    pub remove: Affordance,
}

/// Cart count indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub header_count: u32,
    pub floating_count: u32,
    pub open_cart: Affordance,
}

/// Project the whole widget.
#[must_use]
pub fn project_page(context: &AppContext) -> PageView {
    PageView {
        grid: project_grid(context.catalog()),
        detail: context.detail().map(project_detail),
        drawer: project_drawer(context.cart(), context.drawer_open()),
        summary: project_summary(context.cart()),
    }
}

/// One card per product, or the catalog hint when there are none.
#[must_use]
pub fn project_grid(catalog: &CatalogStore) -> GridView {
    GridView {
        cards: catalog.products().iter().map(project_card).collect(),
        hint: catalog.hint().map(str::to_string),
    }
}

fn project_card(product: &Product) -> ProductCard {
    ProductCard {
        id: product.id.clone(),
        title: product.title.clone(),
        description: product.description.clone(),
        image: product.image_or_default().to_string(),
        view: Affordance::new("View", Gesture::OpenDetail(product.id.clone())),
        quick_add: Affordance::new("Quick Add", Gesture::QuickAdd(product.id.clone())),
    }
}

/// The detail panel for the open product.
#[must_use]
pub fn project_detail(panel: &DetailPanel) -> DetailView {
    let product = panel.product();
    let options = panel
        .options()
        .iter()
        .enumerate()
        .map(|(index, option)| OptionChoice {
            index,
            label: option.label(),
            selected: index == panel.selected(),
            choose: Affordance::new(option.name.clone(), Gesture::SelectOption(index)),
        })
        .collect();

    DetailView {
        product_id: product.id.clone(),
        title: product.title.clone(),
        description: product.description.clone(),
        image: product.image_or_default().to_string(),
        options,
        quantity: panel.quantity(),
        price_label: panel
            .price()
            .map_or_else(|| PRICE_UNAVAILABLE.to_string(), |price| price.to_string()),
        add: Affordance::new("Add to cart", Gesture::ConfirmDetail),
        close: Affordance::new("Close", Gesture::CloseDetail),
        backdrop: Affordance::new(
            "Close",
            Gesture::ClickDetailOverlay(OverlayTarget::Backdrop),
        ),
    }
}

/// The cart drawer, with per-line controls and the subtotal.
#[must_use]
pub fn project_drawer(cart: &CartStore, open: bool) -> DrawerView {
    DrawerView {
        open,
        lines: cart
            .items()
            .iter()
            .enumerate()
            .map(|(index, line)| project_line(index, line))
            .collect(),
        subtotal_label: cart.subtotal_display(),
        empty_message: cart.is_empty().then_some(EMPTY_CART_MESSAGE),
        clear: Affordance::new("Clear cart", Gesture::Clear),
        pay: Affordance::new("Pay", Gesture::Checkout),
        close: Affordance::new("Close", Gesture::CloseCart),
    }
}

fn project_line(index: usize, line: &CartLineItem) -> LineView {
    LineView {
        index,
        title: line.title.clone(),
        image: line
            .image
            .as_deref()
            .filter(|image| !image.is_empty())
            .unwrap_or(DEFAULT_IMAGE)
            .to_string(),
        meta: format!(
            "{} • {} × {}",
            line.option,
            line.unit_price_display(),
            line.qty
        ),
        decrement: Affordance::new("-", Gesture::Decrement(index)),
        increment: Affordance::new("+", Gesture::Increment(index)),
        remove: Affordance::new("Remove", Gesture::Remove(index)),
    }
}

/// Both count badges show the total quantity.
#[must_use]
pub fn project_summary(cart: &CartStore) -> SummaryView {
    let count = cart.total_count();
    SummaryView {
        header_count: count,
        floating_count: count,
        open_cart: Affordance::new("Cart", Gesture::OpenCart),
    }
}
