//! RocketCart CLI - Drive the cart store from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart and its total
//! rocketcart show
//!
//! # Add, update and remove products
//! rocketcart add 1
//! rocketcart update 1 3
//! rocketcart remove 1
//!
//! # Header badge text ("1 item", "3 items")
//! rocketcart badge
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart
//! - `add` - Add one unit of a product
//! - `remove` - Remove a product line
//! - `update` - Set the quantity of a product line
//! - `badge` - Print the distinct-product count label

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketcart_core::ProductId;
use rocketcart_store::StoreConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::cart::{self, CartCommandError};

#[derive(Parser)]
#[command(name = "rocketcart")]
#[command(author, version, about = "RocketCart shopping cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a product line
    Update {
        /// Product ID
        id: ProductId,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Print the header badge label
    Badge,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StoreConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&CartCommandError::from(e)),
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to warn so command output stays readable; RUST_LOG overrides
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketcart_store=warn,rocketcart_cli=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::debug!("Command failed: {e}");
        fail(&e);
    }
}

async fn run(cli: Cli, config: &StoreConfig) -> Result<(), CartCommandError> {
    let store = cart::open_store(config)?;

    match cli.command {
        Commands::Show => cart::show(&store).await,
        Commands::Badge => cart::badge(&store).await,
        Commands::Add { id } => cart::add(&store, id).await?,
        Commands::Remove { id } => cart::remove(&store, id).await?,
        Commands::Update { id, amount } => cart::update(&store, id, amount).await?,
    }
    Ok(())
}

#[allow(clippy::print_stderr)]
fn fail(error: &CartCommandError) -> ! {
    eprintln!("error: {error}");
    std::process::exit(1);
}
