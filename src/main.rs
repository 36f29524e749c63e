//! Sumi-Gather main entry point
//!
//! This is the command-line interface for the Sumi-Gather page harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_gather::config::{load_config_with_hash, validate, Config};
use sumi_gather::crawler::run_all;
use sumi_gather::output::{print_statistics, write_harvest};
use tracing_subscriber::EnvFilter;

/// Sumi-Gather: a patient concurrent page harvester
///
/// Fetches every configured URL, retrying each one after a fixed delay until
/// it answers 200, and prints the extracted records as JSON on stdout.
#[derive(Parser, Debug)]
#[command(name = "sumi-gather")]
#[command(version = "1.0.0")]
#[command(about = "A patient concurrent page harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Harvest these URLs instead of the ones in the config (repeatable)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if !cli.urls.is_empty() {
        tracing::info!("Using {} URLs from the command line", cli.urls.len());
        config.urls = cli.urls;
        validate(&config).context("invalid --url value")?;
    }

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let extractor = config.build_extractor()?;
    let harvest = run_all(&config.urls, config.fetch_config(), extractor)
        .await
        .context("harvest failed")?;

    let stdout = std::io::stdout();
    write_harvest(&mut stdout.lock(), &harvest, cli.pretty)?;

    if !cli.quiet {
        print_statistics(&harvest.stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the JSON result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_gather=info,warn"),
            1 => EnvFilter::new("sumi_gather=debug,info"),
            2 => EnvFilter::new("sumi_gather=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handles --dry-run: shows the effective settings and URL list
fn print_dry_run(config: &Config) {
    let fetch = config.fetch_config();

    println!("=== Sumi-Gather Dry Run ===\n");

    println!("Fetch Configuration:");
    println!("  Connection limit: {}", fetch.connection_limit);
    println!("  Worker count: {}", fetch.worker_count);
    println!("  Retry delay: {}s", fetch.retry_delay.as_secs());
    match fetch.max_attempts {
        Some(max) => println!("  Max attempts: {}", max),
        None => println!("  Max attempts: unbounded"),
    }
    if let Some(timeout) = fetch.request_timeout {
        println!("  Request timeout: {}s", timeout.as_secs());
    }
    println!("  User agent: {}", fetch.user_agent);

    println!("\nExtraction:");
    println!("  Container: {}", config.extract.container);
    for field in &config.extract.fields {
        let source = field.attribute.as_deref().unwrap_or("text");
        let required = if field.required { ", required" } else { "" };
        println!(
            "  - {} <- {} ({}{})",
            field.name, field.selector, source, required
        );
    }

    println!("\nURLs ({}):", config.urls.len());
    for url in &config.urls {
        println!("  * {}", url);
    }

    println!("\n✓ Configuration is valid");
}
