//! tasalab CLI: fetch the informal rate history and print its indicators.
//!
//! Commands:
//! - `analyze`: run the indicator pipeline and print the Output Series
//! - `signals`: list only the buy/sell crossings
//! - `config`: print the default TOML configuration

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tasalab_core::data::{CambioProvider, CircuitBreaker, FileProvider, RateProvider, SyntheticProvider};
use tasalab_core::domain::RsiZone;
use tasalab_core::export::{export_csv, export_json};
use tasalab_core::{AnalyzedRow, Pipeline, PipelineRun, SignalEvent, TasaConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tasalab",
    about = "tasalab: indicators and crossover signals for the informal exchange rate"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and print the Output Series.
    Analyze {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Number of most recent rows shown in table format.
        #[arg(long, default_value_t = 15)]
        rows: usize,

        /// Print the BLAKE3 fingerprint of the Output Series.
        #[arg(long, default_value_t = false)]
        fingerprint: bool,
    },
    /// List buy/sell crossings only.
    Signals {
        #[command(flatten)]
        source: SourceArgs,

        /// Emit JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the default configuration as TOML.
    Config,
}

#[derive(Args)]
struct SourceArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read the raw payload from a local JSON file instead of the remote API.
    #[arg(long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Use a seeded synthetic payload instead of the remote API.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Seed for --synthetic.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Currency code (overrides the config file).
    #[arg(long)]
    currency: Option<String>,

    /// Start of the history window, YYYY-MM-DD[ HH:MM:SS] (overrides the config file).
    #[arg(long)]
    from: Option<String>,

    /// End of the history window (overrides the config file). Defaults to the end of today.
    #[arg(long)]
    to: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Csv,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            source,
            format,
            rows,
            fingerprint,
        } => run_analyze(&source, format, rows, fingerprint),
        Commands::Signals { source, json } => run_signals(&source, json),
        Commands::Config => {
            print!("{}", TasaConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &SourceArgs) -> Result<TasaConfig> {
    let mut config = match &args.config {
        Some(path) => TasaConfig::from_file(path)?,
        None => TasaConfig::default(),
    };

    if let Some(currency) = &args.currency {
        config.source.currency = currency.clone();
    }
    if let Some(from) = &args.from {
        config.source.date_from = from.clone();
    }
    if let Some(to) = &args.to {
        config.source.date_to = Some(to.clone());
    }
    config.validate()?;
    Ok(config)
}

fn provider_for(args: &SourceArgs, config: &TasaConfig) -> Result<Box<dyn RateProvider>> {
    if let Some(path) = &args.input {
        return Ok(Box::new(FileProvider::new(path)));
    }
    if args.synthetic {
        return Ok(Box::new(
            SyntheticProvider::new(args.seed).with_format(config.records.clone()),
        ));
    }
    let breaker = Arc::new(CircuitBreaker::default_provider());
    Ok(Box::new(CambioProvider::new(&config.source, breaker)?))
}

/// Fetch, then run the pipeline.
fn execute(args: &SourceArgs) -> Result<PipelineRun> {
    let config = load_config(args)?;
    let request = config.fetch_request(Local::now().date_naive())?;
    let provider = provider_for(args, &config)?;
    if !provider.is_available() {
        bail!("{} is refusing requests, try again later", provider.name());
    }

    info!(
        provider = provider.name(),
        currency = %request.currency,
        from = %request.date_from,
        to = %request.date_to,
        "fetching rate history"
    );
    let raw = provider
        .fetch(&request)
        .with_context(|| format!("could not load rate history from {}", provider.name()))?;

    let run = Pipeline::new(config.records.clone())
        .run(&raw)
        .context("rate history is not usable")?;

    if !run.rejected.is_empty() {
        warn!(count = run.rejected.len(), "skipped unparsable records");
    }
    Ok(run)
}

fn run_analyze(args: &SourceArgs, format: Format, rows: usize, fingerprint: bool) -> Result<()> {
    let run = execute(args)?;

    if run.output.is_empty() {
        println!("Insufficient data: no row has every indicator defined yet.");
        return Ok(());
    }

    match format {
        Format::Table => print_table(&run, rows),
        Format::Csv => print!("{}", export_csv(&run.output)?),
        Format::Json => println!("{}", export_json(&run.output)?),
    }

    if fingerprint {
        // stderr keeps csv/json output parseable
        eprintln!("fingerprint: {}", run.output.fingerprint());
    }
    Ok(())
}

fn run_signals(args: &SourceArgs, json: bool) -> Result<()> {
    let run = execute(args)?;

    if run.output.is_empty() {
        println!("Insufficient data: no row has every indicator defined yet.");
        return Ok(());
    }

    let crossings: Vec<&AnalyzedRow> = run.output.crossings().collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&crossings)?);
        return Ok(());
    }

    if crossings.is_empty() {
        println!("No crossings in {} analyzed rows.", run.output.len());
        return Ok(());
    }
    print_crossings(&crossings);
    Ok(())
}

fn print_table(run: &PipelineRun, rows: usize) {
    let report = &run.report;
    println!();
    println!("=== Rate Indicators ===");
    println!(
        "Records:        {} seen, {} rejected, {} duplicate",
        report.records_seen, report.records_rejected, report.duplicates_dropped
    );
    println!(
        "Series:         {} points, {} warm-up rows dropped",
        report.series_len, report.rows_dropped
    );
    if let (Some(first), Some(last)) = (run.output.rows.first(), run.output.latest()) {
        println!("Period:         {} to {}", first.date(), last.date());
    }
    println!(
        "Crossings:      {} buy, {} sell",
        report.buy_crosses, report.sell_crosses
    );
    println!();

    println!(
        "{:<10} {:>9} {:>9} {:>9} {:>6} {:<4} {:>8} {:>8} {:>9} {:>9} {:>6} {:<5} {:<4}",
        "Date", "Price", "SMA30", "SMA200", "RSI", "", "MACD", "Signal", "Upper", "Lower", "Vol%", "Trend", ""
    );
    println!("{}", "-".repeat(110));

    let skip = run.output.len().saturating_sub(rows);
    for row in run.output.rows.iter().skip(skip) {
        println!(
            "{:<10} {:>9.2} {:>9.2} {:>9.2} {:>6.1} {:<4} {:>8.3} {:>8.3} {:>9.2} {:>9.2} {:>6.2} {:<5} {:<4}",
            row.date(),
            row.price,
            row.sma30,
            row.sma200,
            row.rsi,
            zone_marker(row.rsi_zone()),
            row.macd,
            row.macd_signal,
            row.upper_band,
            row.lower_band,
            row.volatility_pct,
            row.trend_state.as_str(),
            event_marker(row.signal_event),
        );
    }

    let crossings: Vec<&AnalyzedRow> = run.output.crossings().collect();
    if !crossings.is_empty() {
        println!();
        println!("--- Crossings ---");
        print_crossings(&crossings);
    }
    println!();
}

fn print_crossings(crossings: &[&AnalyzedRow]) {
    println!("{:<10} {:<5} {:>9} {:>9} {:>9}", "Date", "Event", "Price", "SMA30", "SMA200");
    for row in crossings {
        println!(
            "{:<10} {:<5} {:>9.2} {:>9.2} {:>9.2}",
            row.date(),
            event_marker(row.signal_event),
            row.price,
            row.sma30,
            row.sma200
        );
    }
}

fn zone_marker(zone: RsiZone) -> &'static str {
    match zone {
        RsiZone::Overbought => "OB",
        RsiZone::Oversold => "OS",
        RsiZone::Neutral => "",
    }
}

fn event_marker(event: SignalEvent) -> &'static str {
    match event {
        SignalEvent::BuyCross => "BUY",
        SignalEvent::SellCross => "SELL",
        SignalEvent::None => "",
    }
}
