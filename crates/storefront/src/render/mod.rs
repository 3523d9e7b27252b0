//! Renderers for the declarative views.
//!
//! A [`Renderer`] turns [`view`](crate::view) descriptions into concrete output.
//! Views hold no platform details, so renderers can be swapped freely:
//!
//! - [`HtmlRenderer`] - HTMX markup for the preview server (askama templates)
//! - [`TextRenderer`] - plain text for the terminal front end

mod html;
mod text;

pub use html::{Endpoint, HtmlRenderer, HxMethod, endpoint, ids};
pub use text::TextRenderer;

use crate::view::{DetailView, DrawerView, GridView, PageView, SummaryView};

/// Turns view descriptions into output, one method per view region.
pub trait Renderer {
    type Output;
    type Error: std::error::Error;

    /// The full widget.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if rendering fails.
    fn page(&self, page: &PageView) -> Result<Self::Output, Self::Error>;

    /// The product grid (or its placeholder hint).
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if rendering fails.
    fn grid(&self, grid: &GridView) -> Result<Self::Output, Self::Error>;

    /// The detail panel; `None` renders the closed panel.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if rendering fails.
    fn detail(&self, detail: Option<&DetailView>) -> Result<Self::Output, Self::Error>;

    /// The cart drawer.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if rendering fails.
    fn drawer(&self, drawer: &DrawerView) -> Result<Self::Output, Self::Error>;

    /// The cart count badges.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if rendering fails.
    fn summary(&self, summary: &SummaryView) -> Result<Self::Output, Self::Error>;

    /// A transient message for the user.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if rendering fails.
    fn notice(&self, message: &str) -> Result<Self::Output, Self::Error>;
}
