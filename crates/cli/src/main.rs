//! YLK CLI - Browse the catalog and manage the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products
//! ylk catalog
//!
//! # Add two large tees
//! ylk add tee --option Large --qty 2
//!
//! # Show the cart, then drop its first line
//! ylk cart
//! ylk remove 1
//!
//! # Tell running storefronts to reload the catalog
//! ylk signal
//! ```
//!
//! The cart lives in the same data directory the preview server uses, so both
//! front ends see the same cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::{CliError, Session};

#[derive(Parser)]
#[command(name = "ylk")]
#[command(author, version, about = "YLK storefront from the terminal")]
struct Cli {
    /// Catalog document, URL or file path (overrides `YLK_CATALOG`)
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Storage directory (overrides `YLK_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Catalog,
    /// Show a product with its options
    Show {
        /// Product id
        id: String,
    },
    /// Add one of a product's first option
    QuickAdd {
        /// Product id
        id: String,
    },
    /// Add a product with a chosen option and quantity
    Add {
        /// Product id
        id: String,

        /// Option name (defaults to the first option)
        #[arg(short, long)]
        option: Option<String>,

        /// Quantity; anything below 1 counts as 1
        #[arg(short, long, default_value = "1")]
        qty: String,
    },
    /// Show the cart
    Cart,
    /// Add one more of a cart line
    Inc {
        /// Line number as shown by `ylk cart`
        line: usize,
    },
    /// Remove one of a cart line
    Dec {
        /// Line number as shown by `ylk cart`
        line: usize,
    },
    /// Remove a cart line
    Remove {
        /// Line number as shown by `ylk cart`
        line: usize,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Empty the cart
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Demo checkout (no payment is taken)
    Checkout,
    /// Tell other storefront instances to reload the catalog
    Signal,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut session = Session::open(cli.catalog.as_deref(), cli.data_dir)?;

    let output = match cli.command {
        Commands::Catalog => commands::catalog::list(&mut session).await,
        Commands::Show { id } => commands::shop::show(&mut session, &id).await?,
        Commands::QuickAdd { id } => commands::shop::quick_add(&mut session, &id).await?,
        Commands::Add { id, option, qty } => {
            commands::shop::add(&mut session, &id, option.as_deref(), &qty).await?
        }
        Commands::Cart => commands::cart::show(&session),
        Commands::Inc { line } => commands::cart::increment(&mut session, line)?,
        Commands::Dec { line } => commands::cart::decrement(&mut session, line)?,
        Commands::Remove { line, yes } => {
            commands::cart::remove(&mut session, line, &commands::answer(yes))?
        }
        Commands::Clear { yes } => commands::cart::clear(&mut session, &commands::answer(yes))?,
        Commands::Checkout => commands::cart::checkout(&mut session)?,
        Commands::Signal => commands::catalog::signal(&session)?,
    };

    commands::print(&output);
    Ok(())
}
