//! Catalog commands.

use ylk_storefront::render::{Renderer, TextRenderer};
use ylk_storefront::signal;
use ylk_storefront::view;

use super::{CliError, Session};

/// List products. A failed fetch prints the grid hint instead.
pub async fn list(session: &mut Session) -> String {
    session.load_catalog().await;
    let grid = view::project_grid(session.context().catalog());
    match TextRenderer.grid(&grid) {
        Ok(text) => text,
        Err(never) => match never {},
    }
}

/// Broadcast catalog-changed to every storefront on this storage area.
pub fn signal(session: &Session) -> Result<String, CliError> {
    signal::notify_catalog_changed(session.storage())?;
    Ok("Catalog change signalled.".to_string())
}
