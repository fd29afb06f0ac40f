//! Bazaar CLI - catalog inspection and session store management.
//!
//! # Usage
//!
//! ```bash
//! # Print the catalog the storefront would load, as JSON
//! bz-cli catalog
//!
//! # Only the first 10 products
//! bz-cli catalog --first 10
//!
//! # Create the PostgreSQL session table
//! bz-cli migrate sessions
//! ```
//!
//! # Commands
//!
//! - `catalog` - Fetch and print the mapped catalog
//! - `migrate sessions` - Create the `tower_sessions` schema

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bz-cli")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog from Shopify and print it as JSON
    Catalog {
        /// Number of products to fetch (defaults to `STOREFRONT_CATALOG_SIZE`)
        #[arg(short, long)]
        first: Option<i64>,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the session store table
    Sessions,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    match cli.command {
        Commands::Catalog { first } => commands::catalog::print(first).await?,
        Commands::Migrate { target } => match target {
            MigrateTarget::Sessions => commands::migrate::sessions().await?,
        },
    }
    Ok(())
}
