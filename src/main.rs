//! Sitemap-Scout main entry point
//!
//! This is the command-line interface for the Sitemap-Scout sitemap crawler.

use anyhow::Context;
use clap::Parser;
use sitemap_scout::config::{load_config_with_hash, validate, Config};
use sitemap_scout::crawler::crawl;
use sitemap_scout::output::{print_summary, write_reports, ReportContext};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Sitemap-Scout: a sitemap inventory crawler
///
/// Sitemap-Scout finds a site's sitemap, walks every sitemap index and
/// URL set beneath it, sorts the URLs into categories and reports naming
/// patterns and duplicates. Sites that only admit signed crawlers are
/// supported through precomputed bot-access signature headers.
#[derive(Parser, Debug)]
#[command(name = "sitemap-scout")]
#[command(version)]
#[command(about = "A sitemap inventory crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Crawl this site instead of the configured base-url
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write exported reports to this directory
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print the summary only; do not write report files
    #[arg(long)]
    no_export: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

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

    // Load and validate configuration
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    if let Some(base_url) = cli.base_url {
        config.site.base_url = base_url;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output.directory = output_dir;
    }
    validate(&config).context("invalid configuration after command-line overrides")?;

    setup_logging(cli.verbose, cli.quiet, config.output.log_file.as_deref())?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, config_hash, cli.no_export).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// When a log file is configured, every event is also appended to it
/// without ANSI colors.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_scout=info,warn"),
            1 => EnvFilter::new("sitemap_scout=debug,info"),
            2 => EnvFilter::new("sitemap_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(())
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Sitemap-Scout Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!(
        "  Credentials: {}",
        if config.credentials.is_some() {
            "bot-access signature headers"
        } else {
            "none (unauthenticated)"
        }
    );
    println!("  User agent: {}", config.user_agent());

    println!("\nCrawler Configuration:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!(
        "  Retries: {} (delay {}ms)",
        config.crawler.max_retries, config.crawler.retry_delay_ms
    );
    match config.crawl_timeout() {
        Some(timeout) => println!("  Session timeout: {}s", timeout.as_secs()),
        None => println!("  Session timeout: none"),
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    let formats: Vec<String> = config.output.formats.iter().map(|f| f.to_string()).collect();
    println!("  Formats: {}", formats.join(", "));
    if let Some(log_file) = &config.output.log_file {
        println!("  Log file: {}", log_file.display());
    }

    println!("\nExtra Category Rules ({}):", config.category_rules.len());
    for rule in &config.category_rules {
        println!("  - {} <= {}", rule.category, rule.pattern);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String, no_export: bool) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    // Ctrl-C stops the crawl but keeps what was collected
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping crawl");
                cancel.cancel();
            }
        });
    }

    if let Some(timeout) = config.crawl_timeout() {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::warn!("Crawl timeout of {}s reached, stopping crawl", timeout.as_secs());
            cancel.cancel();
        });
    }

    tracing::info!("Starting crawl of {}", config.site.base_url);
    let result = crawl(&config, cancel)
        .await
        .with_context(|| format!("crawl of {} failed", config.site.base_url))?;

    print_summary(&result);

    if no_export || config.output.formats.is_empty() {
        return Ok(());
    }

    let context = ReportContext::new(Some(config_hash));
    let paths = write_reports(
        &result,
        &context,
        &config.output.directory,
        &config.output.formats,
    )
    .context("failed to write reports")?;

    for path in paths {
        println!("✓ Report written to: {}", path.display());
    }

    Ok(())
}
