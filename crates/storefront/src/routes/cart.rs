//! Cart drawer handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Mutations answer with the `#cartDrawer` fragment and an `HX-Trigger:
//! cart-updated` header so the count badges follow.

use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::interaction::{Gesture, PresetAnswer};
use crate::render::Renderer;
use crate::state::AppState;
use crate::view::PageView;

use super::{apply, current_page, fragment};

/// Destructive action form data.
///
/// The page sends `confirm=true` once the user has accepted the prompt.
/// Anything else counts as declined.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirm: bool,
}

fn drawer_fragment(state: &AppState, page: &PageView) -> Result<String> {
    Ok(state.renderer().drawer(&page.drawer)?)
}

async fn drawer_gesture(state: &AppState, gesture: Gesture, confirm: bool) -> Result<Response> {
    let (outcome, page) = apply(state, gesture, PresetAnswer(confirm)).await?;
    if outcome.cancelled {
        tracing::debug!("cart change not confirmed");
    }
    Ok(fragment(drawer_fragment(state, &page)?, &outcome))
}

/// Open the drawer.
#[instrument(skip(state))]
pub async fn open(State(state): State<AppState>) -> Result<Response> {
    drawer_gesture(&state, Gesture::OpenCart, false).await
}

/// Re-render the drawer without changing it (HTMX).
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let page = current_page(&state).await;
    Ok(Html(drawer_fragment(&state, &page)?))
}

/// Close the drawer.
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>) -> Result<Response> {
    drawer_gesture(&state, Gesture::CloseCart, false).await
}

/// One more of a line.
#[instrument(skip(state))]
pub async fn increment(State(state): State<AppState>, Path(index): Path<usize>) -> Result<Response> {
    drawer_gesture(&state, Gesture::Increment(index), false).await
}

/// One fewer of a line; the line is removed when it reaches zero.
#[instrument(skip(state))]
pub async fn decrement(State(state): State<AppState>, Path(index): Path<usize>) -> Result<Response> {
    drawer_gesture(&state, Gesture::Decrement(index), false).await
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response> {
    drawer_gesture(&state, Gesture::Remove(index), form.confirm).await
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, Form(form): Form<ConfirmForm>) -> Result<Response> {
    drawer_gesture(&state, Gesture::Clear, form.confirm).await
}

/// Get the count badges (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let summary = current_page(&state).await.summary;
    Ok(Html(state.renderer().summary(&summary)?))
}

/// Demo checkout. Nothing is charged and the cart is kept.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Result<Response> {
    let (outcome, _) = apply(&state, Gesture::Checkout, PresetAnswer(false)).await?;
    let message = outcome.notice.unwrap_or_default();
    Ok(fragment(state.renderer().notice(message)?, &outcome))
}
