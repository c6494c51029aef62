//! SmartMoney CLI — scan, signal digest, and config commands.
//!
//! Commands:
//! - `scan` — tag every bar of a CSV (or synthetic) input and save artifacts
//! - `signals` — print the recent signals across all symbols
//! - `config` — print the default configuration as TOML

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartmoney_core::{SignalRecord, Tag};
use smartmoney_runner::{run_scan, save_report, LoadOptions, ScanConfig, ScanReport, ScanResult};

#[derive(Parser)]
#[command(
    name = "smartmoney",
    about = "SmartMoney CLI — volume-and-price signal tagger for OHLCV bars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag every bar and save per-symbol artifacts.
    Scan {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory for JSON and CSV artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Print recent signals across all symbols, newest first.
    Signals {
        #[command(flatten)]
        input: InputArgs,

        /// Keep signals dated within this many days of the latest bar.
        #[arg(long, default_value_t = 1)]
        days: u32,

        /// Print the signals as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the default configuration as TOML.
    Config,
}

#[derive(Args)]
struct InputArgs {
    /// CSV file with columns date, symbol, open, high, low, close, volume.
    input: Option<PathBuf>,

    /// Path to a TOML config file. Defaults are used for missing keys.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Restrict the scan to these symbols.
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Generate synthetic bars instead of reading a file (debug only).
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Bars per symbol in synthetic mode.
    #[arg(long, default_value_t = 250)]
    bars: usize,

    /// Scan symbols one at a time instead of in parallel.
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartmoney=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { input, output_dir } => run_scan_cmd(&input, &output_dir),
        Commands::Signals { input, days, json } => run_signals_cmd(&input, days, json),
        Commands::Config => {
            print!("{}", ScanConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn scan_input(input: &InputArgs) -> Result<ScanReport> {
    let config = match &input.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };

    if input.input.is_none() && !input.synthetic {
        anyhow::bail!("an input CSV is required (or pass --synthetic)");
    }

    let options = LoadOptions {
        symbols: input.symbols.clone(),
        synthetic: input.synthetic,
        synthetic_bars: input.bars,
        ..LoadOptions::default()
    };

    let report = run_scan(
        input.input.as_deref(),
        &options,
        &config,
        !input.sequential,
    )
    .context("scan failed")?;

    for failure in &report.failures {
        eprintln!("Error for {}: {}", failure.symbol, failure.error);
    }
    Ok(report)
}

fn run_scan_cmd(input: &InputArgs, output_dir: &Path) -> Result<()> {
    let report = scan_input(input)?;

    for result in &report.results {
        print_summary(result);
    }

    let dirs = save_report(&report, output_dir)
        .with_context(|| format!("failed to save artifacts to {}", output_dir.display()))?;
    println!(
        "Artifacts for {} symbol(s) saved to: {}",
        dirs.len(),
        output_dir.display()
    );

    if !report.failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_signals_cmd(input: &InputArgs, days: u32, json: bool) -> Result<()> {
    let report = scan_input(input)?;
    let recent = report.recent_signals(days);

    if json {
        println!("{}", serde_json::to_string_pretty(&recent)?);
        return Ok(());
    }

    if recent.is_empty() {
        println!("No signals in the last {days} day(s).");
        return Ok(());
    }
    print_signals(&recent);
    Ok(())
}

fn print_summary(result: &ScanResult) {
    println!();
    println!("=== Scan Result ===");
    println!("Symbol:         {}", result.symbol);
    println!(
        "Period:         {} to {}",
        result.fingerprint.first_date, result.fingerprint.last_date
    );
    println!(
        "Bars:           {} ({} rows dropped)",
        result.bar_count(),
        result.prepare_report.dropped_count()
    );
    println!("Signals:        {}", result.signal_count());
    for tag in Tag::ALL.iter().filter(|t| !t.is_none()) {
        if let Some(n) = result.counts.get(tag) {
            println!("  {:<20}{n}", tag.label());
        }
    }
    if let Some(warning) = &result.warning {
        println!("WARNING: {warning}");
    }
    if result.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
}

fn print_signals(signals: &[SignalRecord]) {
    println!(
        "{:<8} {:<10} {:>10} {:>10}  {}",
        "Symbol", "Date", "Close", "Change", "Signal"
    );
    for s in signals {
        println!(
            "{:<8} {:<10} {:>10.2} {:>+10.2}  {} {}",
            s.symbol,
            s.date,
            s.close,
            s.point_change,
            s.glyph(),
            s.label()
        );
    }
}
