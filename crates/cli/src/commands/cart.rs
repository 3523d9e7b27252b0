//! Cart commands. Line numbers are 1-based, as `ylk cart` shows them.

use ylk_storefront::interaction::{Confirm, Gesture, PresetAnswer};
use ylk_storefront::render::{Renderer, TextRenderer};
use ylk_storefront::view;

use super::{CliError, Session, line_index};

const NO_PROMPT: PresetAnswer = PresetAnswer(false);

/// The cart with numbered lines and the subtotal.
pub fn show(session: &Session) -> String {
    let drawer = view::project_drawer(session.context().cart(), true);
    match TextRenderer.drawer(&drawer) {
        Ok(text) => text,
        Err(never) => match never {},
    }
}

pub fn increment(session: &mut Session, line: usize) -> Result<String, CliError> {
    session.dispatch(Gesture::Increment(line_index(line)?), &NO_PROMPT)?;
    Ok(show(session))
}

pub fn decrement(session: &mut Session, line: usize) -> Result<String, CliError> {
    session.dispatch(Gesture::Decrement(line_index(line)?), &NO_PROMPT)?;
    Ok(show(session))
}

pub fn remove(session: &mut Session, line: usize, confirm: &dyn Confirm) -> Result<String, CliError> {
    let outcome = session.dispatch(Gesture::Remove(line_index(line)?), confirm)?;
    if outcome.cancelled {
        return Ok("Cancelled.".to_string());
    }
    Ok(show(session))
}

pub fn clear(session: &mut Session, confirm: &dyn Confirm) -> Result<String, CliError> {
    let outcome = session.dispatch(Gesture::Clear, confirm)?;
    if outcome.cancelled {
        return Ok("Cancelled.".to_string());
    }
    Ok(show(session))
}

/// Demo checkout. The cart is kept.
pub fn checkout(session: &mut Session) -> Result<String, CliError> {
    let outcome = session.dispatch(Gesture::Checkout, &NO_PROMPT)?;
    Ok(outcome.notice.unwrap_or_default().to_string())
}
