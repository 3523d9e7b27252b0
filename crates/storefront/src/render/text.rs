//! Plain-text rendering for terminals.

use std::convert::Infallible;

use crate::view::{DetailView, DrawerView, GridView, PageView, SummaryView};

use super::Renderer;

/// Renders views as plain text, one line per item.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    fn grid_lines(grid: &GridView) -> Vec<String> {
        let mut lines = vec!["Products".to_string()];
        if let Some(hint) = &grid.hint {
            lines.push(format!("  {hint}"));
        }
        for card in &grid.cards {
            lines.push(format!("  {} [{}]", card.title, card.id));
            if !card.description.is_empty() {
                lines.push(format!("    {}", card.description));
            }
        }
        lines
    }

    fn detail_lines(detail: &DetailView) -> Vec<String> {
        let mut lines = vec![format!("{} [{}]", detail.title, detail.product_id)];
        if !detail.description.is_empty() {
            lines.push(detail.description.clone());
        }
        lines.push("Options:".to_string());
        for option in &detail.options {
            let marker = if option.selected { "*" } else { " " };
            lines.push(format!("  ({marker}) {}. {}", option.index + 1, option.label));
        }
        lines.push(format!("Quantity: {}", detail.quantity));
        lines.push(format!("Price: {}", detail.price_label));
        lines
    }

    fn drawer_lines(drawer: &DrawerView) -> Vec<String> {
        let mut lines = vec!["Cart".to_string()];
        if let Some(message) = drawer.empty_message {
            lines.push(format!("  {message}"));
        }
        for line in &drawer.lines {
            lines.push(format!("  {}. {} - {}", line.index + 1, line.title, line.meta));
        }
        lines.push(format!("Subtotal: {}", drawer.subtotal_label));
        lines
    }
}

impl Renderer for TextRenderer {
    type Output = String;
    type Error = Infallible;

    fn page(&self, page: &PageView) -> Result<String, Infallible> {
        let mut sections = vec![
            self.summary(&page.summary)?,
            Self::grid_lines(&page.grid).join("\n"),
        ];
        if let Some(detail) = &page.detail {
            sections.push(Self::detail_lines(detail).join("\n"));
        }
        if page.drawer.open {
            sections.push(Self::drawer_lines(&page.drawer).join("\n"));
        }
        Ok(sections.join("\n\n"))
    }

    fn grid(&self, grid: &GridView) -> Result<String, Infallible> {
        Ok(Self::grid_lines(grid).join("\n"))
    }

    fn detail(&self, detail: Option<&DetailView>) -> Result<String, Infallible> {
        Ok(detail.map_or_else(String::new, |detail| {
            Self::detail_lines(detail).join("\n")
        }))
    }

    fn drawer(&self, drawer: &DrawerView) -> Result<String, Infallible> {
        Ok(Self::drawer_lines(drawer).join("\n"))
    }

    fn summary(&self, summary: &SummaryView) -> Result<String, Infallible> {
        Ok(format!("Cart ({})", summary.header_count))
    }

    fn notice(&self, message: &str) -> Result<String, Infallible> {
        Ok(message.to_string())
    }
}
