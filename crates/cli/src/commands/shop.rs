//! Product commands: show, quick add and add with options.

use ylk_core::ProductId;
use ylk_storefront::interaction::{Gesture, PresetAnswer};
use ylk_storefront::render::{Renderer, TextRenderer};
use ylk_storefront::view;

use super::{CliError, Session};

const NO_PROMPT: PresetAnswer = PresetAnswer(false);

/// Show a product's detail panel.
pub async fn show(session: &mut Session, id: &str) -> Result<String, CliError> {
    session.load_catalog().await;
    session.dispatch(Gesture::OpenDetail(ProductId::new(id)), &NO_PROMPT)?;

    let detail = session.context().detail().map(view::project_detail);
    Ok(render(TextRenderer.detail(detail.as_ref())))
}

/// Add one of the product's first option.
pub async fn quick_add(session: &mut Session, id: &str) -> Result<String, CliError> {
    session.load_catalog().await;
    session.dispatch(Gesture::QuickAdd(ProductId::new(id)), &NO_PROMPT)?;
    tracing::info!(product = id, "quick add");

    Ok(added(session))
}

/// Open the product, pick an option and quantity, and confirm.
///
/// Without `option` the first option is used. `qty` is taken as typed; the
/// panel treats anything that is not a positive number as 1.
pub async fn add(
    session: &mut Session,
    id: &str,
    option: Option<&str>,
    qty: &str,
) -> Result<String, CliError> {
    session.load_catalog().await;
    session.dispatch(Gesture::OpenDetail(ProductId::new(id)), &NO_PROMPT)?;

    if let Some(name) = option {
        let options = session
            .context()
            .detail()
            .map(|panel| panel.options().into_owned())
            .unwrap_or_default();
        let index = options
            .iter()
            .position(|candidate| candidate.name == name)
            .ok_or_else(|| CliError::UnknownOption {
                name: name.to_string(),
                available: options
                    .iter()
                    .map(|candidate| candidate.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        session.dispatch(Gesture::SelectOption(index), &NO_PROMPT)?;
    }

    session.dispatch(Gesture::SetQuantity(qty.to_string()), &NO_PROMPT)?;
    session.dispatch(Gesture::ConfirmDetail, &NO_PROMPT)?;
    Ok(added(session))
}

fn added(session: &Session) -> String {
    let summary = view::project_summary(session.context().cart());
    format!("Added. {}", render(TextRenderer.summary(&summary)))
}

fn render(output: Result<String, std::convert::Infallible>) -> String {
    match output {
        Ok(text) => text,
        Err(never) => match never {},
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::commands::tests::session;

    #[tokio::test]
    async fn test_show_lists_options() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        let text = show(&mut session, "tee").await.unwrap();
        assert!(text.contains("Logo Tee [tee]"));
        assert!(text.contains("(*) 1. Small — $5.00"));
        assert!(text.contains("( ) 2. Large — $8.00"));
    }

    #[tokio::test]
    async fn test_quick_add_numeric_id() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        let text = quick_add(&mut session, "7").await.unwrap();
        assert_eq!(text, "Added. Cart (1)");
        let line = session.context().cart().items().first().unwrap();
        assert_eq!(line.option, "Default");
    }

    #[tokio::test]
    async fn test_add_with_option_and_quantity() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        add(&mut session, "tee", Some("Large"), "3").await.unwrap();
        let cart = session.context().cart();
        assert_eq!(cart.total_count(), 3);
        assert_eq!(cart.subtotal_display(), "$24.00");
    }

    #[tokio::test]
    async fn test_add_invalid_quantity_counts_as_one() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        add(&mut session, "tee", None, "-4").await.unwrap();
        assert_eq!(session.context().cart().total_count(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_option() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        let err = add(&mut session, "tee", Some("Huge"), "1").await.unwrap_err();
        assert!(matches!(err, CliError::UnknownOption { ref available, .. } if available == "Small, Large"));
        assert!(session.context().cart().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        assert!(matches!(
            show(&mut session, "nope").await,
            Err(CliError::Interaction(_))
        ));
    }
}
