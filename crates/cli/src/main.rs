//! Mailchimp Sync CLI - Sync store records to Mailchimp by hand.
//!
//! Reads an exported record from a JSON file and runs the same sync the
//! store runs after a commit.
//!
//! # Usage
//!
//! ```bash
//! # Sync a cart or order
//! mcsync sync order --file order.json
//!
//! # Sync a product, or every variant of it
//! mcsync sync product --file product.json
//! mcsync sync product --file product.json --all-variants
//!
//! # Sync one variant of a product
//! mcsync sync variant --file product.json --variant 41
//!
//! # Sync a customer even when its gate rejects it
//! mcsync sync user --file user.json --force
//! ```
//!
//! # Environment
//!
//! Reads `MAILCHIMP_*` variables (see `mailchimp_sync::config`) and, for
//! error reporting, `SENTRY_DSN` and `SENTRY_ENVIRONMENT`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mcsync")]
#[command(author, version, about = "Mailchimp Sync CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync one record to Mailchimp
    Sync {
        #[command(subcommand)]
        target: SyncTarget,
    },
}

#[derive(Subcommand)]
enum SyncTarget {
    /// Sync an order as a cart or completed order
    Order {
        /// Path to the order JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Skip the enabled switch and gate checks
        #[arg(long)]
        force: bool,
    },
    /// Sync a product
    Product {
        /// Path to the product JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Sync every variant (master included) instead of the product
        #[arg(long)]
        all_variants: bool,

        /// Skip the enabled switch and gate checks
        #[arg(long)]
        force: bool,
    },
    /// Sync one variant of a product
    Variant {
        /// Path to the owning product JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Id of the variant to sync
        #[arg(long)]
        variant: i64,

        /// Skip the enabled switch and gate checks
        #[arg(long)]
        force: bool,
    },
    /// Sync a user as a customer
    User {
        /// Path to the user JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Skip the enabled switch and gate checks
        #[arg(long)]
        force: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty())?;
    let environment = std::env::var("SENTRY_ENVIRONMENT")
        .ok()
        .filter(|v| !v.is_empty());

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: environment.map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Route warnings and errors to Sentry as events, info and debug as breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before Sentry reads its DSN
    let _ = dotenvy::dotenv();
    let _sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mailchimp_sync=info,mcsync=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Sync { target } => match target {
            SyncTarget::Order { file, force } => commands::sync::order(&file, force).await?,
            SyncTarget::Product {
                file,
                all_variants,
                force,
            } => commands::sync::product(&file, all_variants, force).await?,
            SyncTarget::Variant {
                file,
                variant,
                force,
            } => commands::sync::variant(&file, variant, force).await?,
            SyncTarget::User { file, force } => commands::sync::user(&file, force).await?,
        },
    }
    Ok(())
}
