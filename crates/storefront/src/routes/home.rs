//! Full page and grid handlers.

use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use tracing::instrument;

use crate::error::Result;
use crate::render::Renderer;
use crate::state::AppState;
use crate::view;

use super::current_page;

/// Render the whole widget.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let page = current_page(&state).await;
    Ok(Html(state.renderer().page(&page)?))
}

/// Liveness health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}

/// Render the product grid (HTMX).
///
/// Polled by the page so a reloaded catalog shows up without a full refresh.
#[instrument(skip(state))]
pub async fn grid(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let grid = view::project_grid(state.context().lock().await.catalog());
    Ok(Html(state.renderer().grid(&grid)?))
}
