//! BackScanner main entry point
//!
//! This is the command-line interface for scanning archived PDF snapshots
//! for sensitive keywords.

use anyhow::Context;
use backscanner::archive::{build_http_client, list_snapshots};
use backscanner::config::{load_config, Config};
use backscanner::extract::is_ocr_available;
use backscanner::keywords::{load_keywords, KeywordSet};
use backscanner::output::print_statistics;
use backscanner::scanner::scan;
use backscanner::targets::load_targets;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// BackScanner: sensitive keyword scanner for archived PDFs
///
/// BackScanner lists every web archive capture of each PDF in a URL list,
/// fetches the captures with retry and backoff, extracts their text (with
/// an OCR fallback) and records every wordlist hit to a report file.
#[derive(Parser, Debug)]
#[command(name = "backscanner")]
#[command(version)]
#[command(about = "Scan archived PDF snapshots for sensitive keywords", long_about = None)]
struct Cli {
    /// File with one target PDF URL per line (prompted for when omitted)
    #[arg(value_name = "URL_LIST")]
    url_list: Option<PathBuf>,

    /// File with one keyword per line (prompted for when omitted)
    #[arg(value_name = "WORDLIST")]
    wordlist: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report file, overriding the configured path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pause between snapshot requests in milliseconds, overriding the config
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Load inputs and show what would be scanned without contacting the archive
    #[arg(long, conflicts_with = "list_snapshots")]
    dry_run: bool,

    /// List the archived captures of every target without fetching them
    #[arg(long, conflicts_with = "dry_run")]
    list_snapshots: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let url_list = match &cli.url_list {
        Some(path) => path.clone(),
        None => prompt_path("Path to PDF URL list: ")?,
    };
    let wordlist = match &cli.wordlist {
        Some(path) => path.clone(),
        None => prompt_path("Path to wordlist: ")?,
    };

    // Unreadable inputs end the run before anything is scanned
    let keywords = load_keywords(&wordlist).map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    let targets = load_targets(&url_list).map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    if cli.dry_run {
        handle_dry_run(&config, &keywords, &targets);
    } else if cli.list_snapshots {
        handle_list_snapshots(&config, &targets).await?;
    } else {
        handle_scan(&config, keywords, &targets).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("backscanner=info,warn"),
            1 => EnvFilter::new("backscanner=debug,info"),
            2 => EnvFilter::new("backscanner=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.report_path = output.display().to_string();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.scan.request_delay_ms = delay_ms;
    }

    Ok(config)
}

/// Asks for a file path on stdin
fn prompt_path(prompt: &str) -> anyhow::Result<PathBuf> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", prompt)?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read path from stdin")?;

    let path = line.trim();
    if path.is_empty() {
        anyhow::bail!("no path given");
    }

    Ok(PathBuf::from(path))
}

/// Handles the --dry-run mode: shows what would be scanned
fn handle_dry_run(config: &Config, keywords: &KeywordSet, targets: &[String]) {
    println!("=== BackScanner Dry Run ===\n");

    println!("Archive:");
    println!("  Base URL: {}", config.archive.base_url);
    println!("  Index: {}", config.archive.index_url());

    println!("\nFetch Policy:");
    println!("  Max retries: {}", config.fetch.max_retries);
    println!("  Base delay: {}ms", config.fetch.base_delay_ms);
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Retry on non-200: {}", config.fetch.retry_on_status);
    println!("  Delay between requests: {}ms", config.scan.request_delay_ms);

    println!("\nOCR:");
    if config.ocr.enabled {
        println!("  DPI: {}, language: {}", config.ocr.dpi, config.ocr.language);
        if is_ocr_available(&config.ocr) {
            println!("  Tools: available");
        } else {
            println!("  Tools: MISSING (scanned PDFs will yield no text)");
        }
    } else {
        println!("  Disabled");
    }

    println!("\nReport: {}", config.output.report_path);

    println!("\nKeywords ({}):", keywords.len());
    for term in keywords.terms() {
        println!("  - {}", term);
    }

    println!("\nTargets ({}):", targets.len());
    for target in targets {
        println!("  - {}", target);
    }

    println!("\n✓ Inputs are valid");
}

/// Handles the --list-snapshots mode: enumerates captures without fetching
async fn handle_list_snapshots(config: &Config, targets: &[String]) -> anyhow::Result<()> {
    let client = build_http_client(&config.fetch)?;

    for target in targets {
        println!("{}", target);
        let snapshots = list_snapshots(&client, &config.archive, target).await;
        if snapshots.is_empty() {
            println!("  (no snapshots)");
        }
        for snapshot in &snapshots {
            let url = snapshot.archived_url(&config.archive.base_url, target);
            match snapshot.captured_at() {
                Some(at) => println!("  {}  {}", at, url),
                None => println!("  {}  {}", snapshot.timestamp(), url),
            }
        }
    }

    Ok(())
}

/// Handles the main scan operation
async fn handle_scan(
    config: &Config,
    keywords: KeywordSet,
    targets: &[String],
) -> anyhow::Result<()> {
    tracing::info!(
        "Scanning {} targets for {} keywords",
        targets.len(),
        keywords.len()
    );

    match scan(config, keywords, targets).await {
        Ok(stats) => {
            print_statistics(&stats);
            tracing::info!(
                "✅ Scan finished. Results saved to {}",
                config.output.report_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scan failed: {}", e);
            Err(e.into())
        }
    }
}
