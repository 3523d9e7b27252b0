//! CLI command implementations.
//!
//! Each command opens a [`Session`] over the shared storage area, applies
//! gestures to its widget context and returns the text to print.

pub mod cart;
pub mod catalog;
pub mod shop;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use ylk_storefront::catalog::{CatalogError, CatalogLocation};
use ylk_storefront::config::{ConfigError, StorefrontConfig};
use ylk_storefront::context::AppContext;
use ylk_storefront::interaction::{Confirm, Gesture, InteractionError, Outcome};
use ylk_storefront::storage::{FileStorage, LocalStorage, StorageError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Interaction(#[from] InteractionError),

    /// The product has no option with this name.
    #[error("No option named {name:?}. Available: {available}")]
    UnknownOption { name: String, available: String },

    /// Line numbers start at 1.
    #[error("Line numbers start at 1")]
    InvalidLine,
}

/// A widget context over the configured catalog and storage area.
pub struct Session {
    context: AppContext,
    storage: Arc<FileStorage>,
}

impl Session {
    /// Open a session from the environment, with flag overrides.
    ///
    /// The catalog is not fetched until a command needs it.
    pub fn open(catalog: Option<&str>, data_dir: Option<PathBuf>) -> Result<Self, CliError> {
        let mut config = StorefrontConfig::from_env()?;
        if let Some(catalog) = catalog {
            config.catalog = CatalogLocation::parse(catalog)?;
        }
        if let Some(data_dir) = data_dir {
            config.data_dir = data_dir;
        }
        tracing::debug!(catalog = %config.catalog, data_dir = %config.data_dir.display(), "opening session");

        let storage = Arc::new(FileStorage::open(&config.data_dir)?);
        Ok(Self::new(config.catalog, storage))
    }

    pub fn new(catalog: CatalogLocation, storage: Arc<FileStorage>) -> Self {
        let context = AppContext::open(catalog.into_source(), Arc::clone(&storage) as Arc<dyn LocalStorage>);
        Self { context, storage }
    }

    /// Fetch the catalog. A failure leaves it empty with a hint for the grid.
    pub async fn load_catalog(&mut self) {
        if let Err(e) = self.context.load_catalog().await {
            tracing::debug!(error = %e, "continuing with an empty catalog");
        }
    }

    pub fn dispatch(&mut self, gesture: Gesture, confirm: &dyn Confirm) -> Result<Outcome, CliError> {
        Ok(self.context.dispatch(gesture, confirm)?)
    }

    pub const fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn storage(&self) -> &dyn LocalStorage {
        self.storage.as_ref()
    }
}

/// How destructive commands are confirmed.
#[derive(Debug, Clone, Copy)]
pub enum Answer {
    /// `--yes` was given.
    Yes,
    /// Ask on stdin.
    Ask,
}

/// The confirmation policy for a command's `--yes` flag.
pub const fn answer(yes: bool) -> Answer {
    if yes { Answer::Yes } else { Answer::Ask }
}

impl Confirm for Answer {
    fn confirm(&self, prompt: &str) -> bool {
        match self {
            Self::Yes => true,
            Self::Ask => ask(prompt).unwrap_or(false),
        }
    }
}

#[allow(clippy::print_stdout)]
fn ask(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim(), "y" | "Y")
}

/// Convert a 1-based line number to a cart index.
pub fn line_index(line: usize) -> Result<usize, CliError> {
    line.checked_sub(1).ok_or(CliError::InvalidLine)
}

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn print(output: &str) {
    if !output.is_empty() {
        println!("{output}");
    }
}
