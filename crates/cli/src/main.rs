//! Digital Order CLI - Main Entry Point
//!
//! Opens, inspects, and closes checks on the Digital Order API from the
//! command line, for setting up and cleaning up QA tables by hand.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

mod commands;
mod output;

use commands::{check, menu, tables};
use dorder_common::{default_config_path, ApiConfig};
use dorder_e2e::OrderClient;

/// Digital Order CLI - check lifecycle tooling for QA tables
#[derive(Parser)]
#[command(name = "dorder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to ~/.dorder/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known tables and their frontend URLs
    Tables,

    /// Print the ordering URL for a table
    Url {
        /// Table number
        table: u32,
    },

    /// Open a check on a table, or find the one already open
    Open(check::TableArgs),

    /// Show a table's check contents and totals
    Details(check::TableArgs),

    /// Add a menu item to a table's check
    AddItem(check::AddItemArgs),

    /// Pay off and close a table's check
    Close(check::TableArgs),

    /// Show the menu for the configured revenue center
    Menu(menu::MenuArgs),

    /// Run setup, details, close, and teardown against a table
    Smoke(check::TableArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let mut config = ApiConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    config.apply_env()?;
    debug!(
        "Config from {}: API {}, property {}, revenue center {}",
        config_path.display(),
        config.base_url,
        config.venue.property_id,
        config.venue.revenue_center_id
    );

    // Commands that only read the table mapping work without credentials
    let client = OrderClient::new(config.clone()).context(
        "Cannot create API client (set DORDER_SUBSCRIPTION_KEY and DORDER_PASSKEY, or add them to the config file)",
    );

    match cli.command {
        Commands::Tables => tables::list(&config, cli.format),
        Commands::Url { table } => tables::url(&config, table, cli.format)?,
        Commands::Open(args) => check::open(args, &client?, cli.format).await?,
        Commands::Details(args) => check::details(args, &client?, cli.format).await?,
        Commands::AddItem(args) => check::add_item(args, &client?, cli.format).await?,
        Commands::Close(args) => check::close(args, &client?, cli.format).await?,
        Commands::Menu(args) => menu::execute(args, &client?, cli.format).await?,
        Commands::Smoke(args) => check::smoke(args, &client?, cli.format).await?,
    }

    Ok(())
}
