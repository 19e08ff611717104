//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest product harvester.

use anyhow::Context;
use catalog_harvest::config::load_config_or_default;
use catalog_harvest::output::print_statistics;
use catalog_harvest::{harvest, persist};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a polite storefront catalog harvester
///
/// Discovers every collection on the catalog root, paginates through each one,
/// and writes the product listings it finds to a JSON document. Honors
/// robots.txt and waits a randomized delay before every request.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite storefront catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write products here instead of the configured output path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Built-in configuration is invalid".to_string(),
    })?;
    let destination = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.path));

    tracing::info!("Starting to scrape products from {}", config.site.base_url);
    let result = harvest(&config)
        .await
        .context("Harvest could not start")?;

    tracing::info!("Found {} products", result.len());

    persist(&result.products, &destination)
        .with_context(|| format!("Failed to write {}", destination.display()))?;
    tracing::info!("Products saved to {}", destination.display());

    if !cli.quiet {
        println!();
        print_statistics(&result.stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
