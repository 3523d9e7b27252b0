//! Catalog reload and change-signal handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use tracing::instrument;

use crate::catalog;
use crate::error::Result;
use crate::render::Renderer;
use crate::signal;
use crate::state::AppState;
use crate::view;

/// Refetch this server's catalog and return the new grid (HTMX).
///
/// A failed fetch still answers 200: the grid shows the failure hint.
#[instrument(skip(state))]
pub async fn reload(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let source = state.context().lock().await.catalog().source();
    let result = catalog::fetch_validated(source.as_ref()).await;

    let mut context = state.context().lock().await;
    // Failure is recorded in the store and shown as the grid hint
    let _ = context.apply_catalog(result);
    let grid = view::project_grid(context.catalog());
    drop(context);

    Ok(Html(state.renderer().grid(&grid)?))
}

/// Tell every other context sharing the storage area to refetch.
#[instrument(skip(state))]
pub async fn signal(State(state): State<AppState>) -> Result<StatusCode> {
    signal::notify_catalog_changed(state.storage())?;
    Ok(StatusCode::ACCEPTED)
}
