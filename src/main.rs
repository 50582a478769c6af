//! preview-sweep main entry point
//!
//! This is the command-line interface for the preview sweeper.

use anyhow::Context;
use clap::Parser;
use preview_sweep::config::{load_config_with_hash, Config, Strategy};
use preview_sweep::crawler::{plan_sweep, run_sweep};
use preview_sweep::output::{load_statistics, print_plan, print_report, print_statistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// preview-sweep: render every preview page once and checkpoint the result
///
/// preview-sweep enumerates preview pages (by scraping a listing page or by
/// querying the catalog API), loads each one in a real browser, and records
/// whether it rendered. Already-checkpointed pages are skipped, so an
/// interrupted sweep resumes where it stopped.
#[derive(Parser, Debug)]
#[command(name = "preview-sweep")]
#[command(version)]
#[command(about = "Render preview pages once and checkpoint the outcome", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Enumerate candidates and show which would be visited, without rendering
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the checkpoint files and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config).await
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_sweep(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("preview_sweep=info,warn"),
            1 => EnvFilter::new("preview_sweep=debug,info"),
            2 => EnvFilter::new("preview_sweep=trace,debug"),
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

/// Handles the --dry-run mode: enumerates candidates and shows the plan
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== preview-sweep Dry Run ===\n");

    println!("Preview:");
    println!("  Root: {}", config.preview.root);
    println!("  Rerender: {}", config.preview.rerender);

    println!("\nRenderer:");
    println!("  WebDriver: {}", config.renderer.webdriver_url);
    println!("  Browser: {:?}", config.renderer.browser);
    println!("  Timeout: {}s", config.renderer.timeout_secs);

    println!("\nCheckpoint:");
    println!("  Completed: {}", config.checkpoint.completed_path);
    match &config.checkpoint.errors_path {
        Some(path) => println!("  Errored: {}", path),
        None => println!("  Errored: (disabled)"),
    }

    match config.crawler.strategy {
        Strategy::Scrape => {
            let scrape = config.scrape_section()?;
            println!("\nStrategy: scrape");
            println!("  Listing: {}", scrape.listing_query);
            println!("  Path prefix: {}", scrape.path_prefix);
        }
        Strategy::Catalog => {
            let catalog = config.catalog_section()?;
            println!("\nStrategy: catalog");
            println!("  API: {}", catalog.api_url);
            println!("  Owners: {}", catalog.owners.join(", "));
            println!("  Subjects: {}", catalog.subjects.join(", "));
        }
    }
    println!();

    let plan = plan_sweep(config).await.context("Failed to enumerate candidates")?;
    print_plan(&plan);

    println!("✓ Configuration is valid");
    println!(
        "✓ Would render {} pages ({} already checkpointed)",
        plan.pending.len(),
        plan.skipped.len()
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the checkpoint files
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let stats = load_statistics(&config.checkpoint)?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the main sweep
async fn handle_sweep(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting sweep of {} ({:?} strategy)",
        config.preview.root,
        config.crawler.strategy
    );

    match run_sweep(config).await {
        Ok(report) => {
            tracing::info!("Sweep completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Sweep failed: {}", e);
            Err(e.into())
        }
    }
}
