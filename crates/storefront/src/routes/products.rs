//! Product detail panel handlers.
//!
//! Every handler answers with the `#productModal` fragment, except quick add,
//! which only touches the cart and answers with the count badges.

use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};
use serde::Deserialize;
use tracing::instrument;
use ylk_core::ProductId;

use crate::error::{AppError, Result};
use crate::interaction::{Gesture, OverlayTarget, PresetAnswer};
use crate::render::Renderer;
use crate::state::AppState;
use crate::view::PageView;

use super::{apply, fragment};

/// Option selection form data.
#[derive(Debug, Deserialize)]
pub struct OptionForm {
    pub index: usize,
}

/// Quantity input form data. Kept raw; the panel decides what it means.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    #[serde(default)]
    pub quantity: String,
}

/// Confirm form data. Carries the quantity input when it is included.
#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    pub quantity: Option<String>,
}

/// Overlay click form data.
#[derive(Debug, Deserialize)]
pub struct OverlayForm {
    pub target: String,
}

fn detail_fragment(state: &AppState, page: &PageView) -> Result<String> {
    Ok(state.renderer().detail(page.detail.as_ref())?)
}

/// Open the detail panel for a product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let (outcome, page) = apply(
        &state,
        Gesture::OpenDetail(ProductId::new(id)),
        PresetAnswer(false),
    )
    .await?;
    Ok(fragment(detail_fragment(&state, &page)?, &outcome))
}

/// Add one of the product's first option to the cart (HTMX).
///
/// Returns the count badges with an HTMX trigger so the drawer refreshes too.
#[instrument(skip(state))]
pub async fn quick_add(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let (outcome, page) = apply(
        &state,
        Gesture::QuickAdd(ProductId::new(id)),
        PresetAnswer(false),
    )
    .await?;
    Ok(fragment(state.renderer().summary(&page.summary)?, &outcome))
}

/// Select an option in the open panel.
#[instrument(skip(state))]
pub async fn select_option(
    State(state): State<AppState>,
    Form(form): Form<OptionForm>,
) -> Result<Response> {
    let (outcome, page) = apply(&state, Gesture::SelectOption(form.index), PresetAnswer(false)).await?;
    Ok(fragment(detail_fragment(&state, &page)?, &outcome))
}

/// Set the quantity in the open panel.
#[instrument(skip(state))]
pub async fn set_quantity(
    State(state): State<AppState>,
    Form(form): Form<QuantityForm>,
) -> Result<Response> {
    let (outcome, page) = apply(
        &state,
        Gesture::SetQuantity(form.quantity),
        PresetAnswer(false),
    )
    .await?;
    Ok(fragment(detail_fragment(&state, &page)?, &outcome))
}

/// Add the panel's selection to the cart and close it.
#[instrument(skip(state))]
pub async fn confirm(
    State(state): State<AppState>,
    Form(form): Form<ConfirmForm>,
) -> Result<Response> {
    if let Some(quantity) = form.quantity {
        apply(&state, Gesture::SetQuantity(quantity), PresetAnswer(false)).await?;
    }
    let (outcome, page) = apply(&state, Gesture::ConfirmDetail, PresetAnswer(false)).await?;
    Ok(fragment(detail_fragment(&state, &page)?, &outcome))
}

/// Close the panel.
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>) -> Result<Response> {
    let (outcome, page) = apply(&state, Gesture::CloseDetail, PresetAnswer(false)).await?;
    Ok(fragment(detail_fragment(&state, &page)?, &outcome))
}

/// Handle a click on the panel overlay.
#[instrument(skip(state))]
pub async fn overlay(
    State(state): State<AppState>,
    Form(form): Form<OverlayForm>,
) -> Result<Response> {
    let target = match form.target.as_str() {
        "backdrop" => OverlayTarget::Backdrop,
        "content" => OverlayTarget::Content,
        other => return Err(AppError::BadRequest(format!("unknown overlay target: {other}"))),
    };
    let (outcome, page) = apply(
        &state,
        Gesture::ClickDetailOverlay(target),
        PresetAnswer(false),
    )
    .await?;
    Ok(fragment(detail_fragment(&state, &page)?, &outcome))
}
