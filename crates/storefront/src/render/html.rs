//! HTMX markup for the preview server.
//!
//! Each region renders to a fragment whose root element carries a stable id,
//! so a response can replace exactly the region a gesture refreshed. Every
//! affordance becomes an `hx-*` attribute set pointing at the route that
//! dispatches its gesture; the `attrs` macro in `partials/hx.html` writes
//! those attributes from the affordance's [`Endpoint`].

use askama::Template;

use crate::filters;
use crate::interaction::{Gesture, OverlayTarget};
use crate::view::{Affordance, DetailView, DrawerView, GridView, PageView, SummaryView};

use super::Renderer;

/// Element ids of the swappable regions.
pub mod ids {
    pub const GRID: &str = "productsGrid";
    pub const DETAIL: &str = "productModal";
    pub const DRAWER: &str = "cartDrawer";
    pub const SUMMARY: &str = "cartSummary";
    pub const NOTICE: &str = "notice";
}

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HxMethod {
    Get,
    Post,
}

impl HxMethod {
    /// The htmx attribute that issues a request with this method.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Get => "hx-get",
            Self::Post => "hx-post",
        }
    }
}

/// Where a gesture is sent and which region its response replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HxMethod,
    pub path: String,
    /// Id of the element the response replaces.
    pub target: &'static str,
    /// Extra form values sent with the request.
    pub vals: Vec<(&'static str, String)>,
    /// Selector of an input whose value is sent along.
    pub include: Option<&'static str>,
}

impl Endpoint {
    fn new(method: HxMethod, path: impl Into<String>, target: &'static str) -> Self {
        Self {
            method,
            path: path.into(),
            target,
            vals: Vec::new(),
            include: None,
        }
    }

    fn val(mut self, name: &'static str, value: impl ToString) -> Self {
        self.vals.push((name, value.to_string()));
        self
    }

    /// Extra form values as the JSON object `hx-vals` expects.
    #[must_use]
    pub fn vals_json(&self) -> Option<String> {
        if self.vals.is_empty() {
            return None;
        }
        let vals: serde_json::Map<String, serde_json::Value> = self
            .vals
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone().into()))
            .collect();
        Some(serde_json::Value::Object(vals).to_string())
    }
}

/// The route that dispatches `gesture`.
#[must_use]
pub fn endpoint(gesture: &Gesture) -> Endpoint {
    use HxMethod::{Get, Post};

    match gesture {
        Gesture::OpenDetail(id) => Endpoint::new(Get, product_path(id.as_str(), ""), ids::DETAIL),
        Gesture::QuickAdd(id) => {
            Endpoint::new(Post, product_path(id.as_str(), "/quick-add"), ids::SUMMARY)
        }
        Gesture::SelectOption(index) => {
            Endpoint::new(Post, "/detail/option", ids::DETAIL).val("index", index)
        }
        Gesture::SetQuantity(raw) => {
            Endpoint::new(Post, "/detail/quantity", ids::DETAIL).val("quantity", raw)
        }
        Gesture::ConfirmDetail => Endpoint {
            include: Some("#modalQty"),
            ..Endpoint::new(Post, "/detail/confirm", ids::DETAIL)
        },
        Gesture::CloseDetail => Endpoint::new(Post, "/detail/close", ids::DETAIL),
        Gesture::ClickDetailOverlay(target) => {
            let target = match target {
                OverlayTarget::Backdrop => "backdrop",
                OverlayTarget::Content => "content",
            };
            Endpoint::new(Post, "/detail/overlay", ids::DETAIL).val("target", target)
        }
        Gesture::OpenCart => Endpoint::new(Get, "/cart", ids::DRAWER),
        Gesture::CloseCart => Endpoint::new(Post, "/cart/close", ids::DRAWER),
        Gesture::Increment(index) => {
            Endpoint::new(Post, format!("/cart/lines/{index}/increment"), ids::DRAWER)
        }
        Gesture::Decrement(index) => {
            Endpoint::new(Post, format!("/cart/lines/{index}/decrement"), ids::DRAWER)
        }
        Gesture::Remove(index) => {
            Endpoint::new(Post, format!("/cart/lines/{index}/remove"), ids::DRAWER)
                .val("confirm", true)
        }
        Gesture::Clear => Endpoint::new(Post, "/cart/clear", ids::DRAWER).val("confirm", true),
        Gesture::Checkout => Endpoint::new(Post, "/checkout", ids::NOTICE),
    }
}

fn product_path(id: &str, suffix: &str) -> String {
    format!("/products/{}{suffix}", urlencoding::encode(id))
}

impl Affordance {
    /// The route this affordance's gesture is sent to.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        endpoint(&self.gesture)
    }
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    grid: &'a GridView,
    detail: Option<&'a DetailView>,
    drawer: &'a DrawerView,
    summary: &'a SummaryView,
}

#[derive(Template)]
#[template(path = "partials/grid.html")]
struct GridTemplate<'a> {
    grid: &'a GridView,
}

#[derive(Template)]
#[template(path = "partials/detail.html")]
struct DetailTemplate<'a> {
    detail: Option<&'a DetailView>,
}

#[derive(Template)]
#[template(path = "partials/drawer.html")]
struct DrawerTemplate<'a> {
    drawer: &'a DrawerView,
}

#[derive(Template)]
#[template(path = "partials/summary.html")]
struct SummaryTemplate<'a> {
    summary: &'a SummaryView,
}

#[derive(Template)]
#[template(path = "partials/notice.html")]
struct NoticeTemplate<'a> {
    message: &'a str,
}

/// Renders views as HTMX fragments with askama.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    type Output = String;
    type Error = askama::Error;

    fn page(&self, page: &PageView) -> Result<String, askama::Error> {
        PageTemplate {
            grid: &page.grid,
            detail: page.detail.as_ref(),
            drawer: &page.drawer,
            summary: &page.summary,
        }
        .render()
    }

    fn grid(&self, grid: &GridView) -> Result<String, askama::Error> {
        GridTemplate { grid }.render()
    }

    fn detail(&self, detail: Option<&DetailView>) -> Result<String, askama::Error> {
        DetailTemplate { detail }.render()
    }

    fn drawer(&self, drawer: &DrawerView) -> Result<String, askama::Error> {
        DrawerTemplate { drawer }.render()
    }

    fn summary(&self, summary: &SummaryView) -> Result<String, askama::Error> {
        SummaryTemplate { summary }.render()
    }

    fn notice(&self, message: &str) -> Result<String, askama::Error> {
        NoticeTemplate { message }.render()
    }
}
