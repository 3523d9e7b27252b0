//! HTTP route handlers for the preview server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Full page
//! GET  /health                        - Health check
//! GET  /grid                          - Product grid (fragment, polled)
//!
//! # Product detail panel (HTMX fragments)
//! GET  /products/{id}                 - Open the panel
//! POST /products/{id}/quick-add       - Add the first option (summary, triggers cart-updated)
//! POST /detail/option                 - Select an option
//! POST /detail/quantity               - Set the quantity
//! POST /detail/confirm                - Add to cart and close (triggers cart-updated)
//! POST /detail/close                  - Close the panel
//! POST /detail/overlay                - Overlay click (backdrop closes, content is a no-op)
//!
//! # Cart drawer (HTMX fragments)
//! GET  /cart                          - Open the drawer
//! GET  /cart/refresh                  - Re-render the drawer as is
//! POST /cart/close                    - Close the drawer
//! POST /cart/lines/{index}/increment  - One more of a line
//! POST /cart/lines/{index}/decrement  - One fewer; the line goes at zero
//! POST /cart/lines/{index}/remove     - Remove a line (needs confirm=true)
//! POST /cart/clear                    - Empty the cart (needs confirm=true)
//! GET  /cart/count                    - Count badges
//! POST /checkout                      - Demo checkout notice
//!
//! # Catalog
//! POST /catalog/reload                - Refetch the catalog (grid fragment)
//! POST /catalog/signal                - Tell other contexts to refetch
//!
//! GET  /*                             - Static assets
//! ```

pub mod cart;
pub mod catalog;
pub mod home;
pub mod products;

use axum::{
    Router,
    response::{AppendHeaders, Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::{Result, add_breadcrumb};
use crate::interaction::{Gesture, Outcome, PresetAnswer};
use crate::state::AppState;
use crate::view::PageView;

/// HTMX event fired whenever the cart changes.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Create the detail panel routes router.
pub fn detail_routes() -> Router<AppState> {
    Router::new()
        .route("/option", post(products::select_option))
        .route("/quantity", post(products::set_quantity))
        .route("/confirm", post(products::confirm))
        .route("/close", post(products::close))
        .route("/overlay", post(products::overlay))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::open))
        .route("/refresh", get(cart::refresh))
        .route("/close", post(cart::close))
        .route("/lines/{index}/increment", post(cart::increment))
        .route("/lines/{index}/decrement", post(cart::decrement))
        .route("/lines/{index}/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the preview server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .route("/grid", get(home::grid))
        .route("/products/{id}", get(products::show))
        .route("/products/{id}/quick-add", post(products::quick_add))
        .nest("/detail", detail_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .route("/catalog/reload", post(catalog::reload))
        .route("/catalog/signal", post(catalog::signal))
}

/// The complete application: routes, static assets and request tracing.
pub fn app(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config().static_dir);
    routes()
        .fallback_service(assets)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Project the page over the cart as currently persisted.
///
/// The storage area may be shared with the `ylk` CLI, so every request starts
/// from the stored cart the way a fresh page load would.
async fn current_page(state: &AppState) -> PageView {
    let mut context = state.context().lock().await;
    context.reload_cart();
    context.view()
}

/// Apply a gesture to the shared context and project the page afterwards.
async fn apply(state: &AppState, gesture: Gesture, confirm: PresetAnswer) -> Result<(Outcome, PageView)> {
    add_breadcrumb("gesture", &format!("{gesture:?}"), None);
    let mut context = state.context().lock().await;
    context.reload_cart();
    let outcome = context.dispatch(gesture, &confirm)?;
    Ok((outcome, context.view()))
}

/// Wrap a fragment, announcing cart changes to the rest of the page.
fn fragment(html: String, outcome: &Outcome) -> Response {
    if outcome.refresh.cart_changed() {
        (
            AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
            Html(html),
        )
            .into_response()
    } else {
        Html(html).into_response()
    }
}
