//! volprep CLI — prepare price data for volatility modeling.
//!
//! Commands:
//! - `clean-index` — clean a raw index export, add log returns, write CSV and charts
//! - `prepare-garch` — fetch daily bars, derive volatility features, write CSV

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;
use volprep_core::config::{GarchConfig, ProviderKind, VolprepConfig};
use volprep_core::data::eikon::DEFAULT_PROXY_URL;
use volprep_core::data::{DataError, DataProvider, EikonProvider, YahooProvider};
use volprep_core::pipeline::{run_garch, run_index, GarchReport, IndexReport};
use volprep_core::PipelineOutcome;

#[derive(Parser)]
#[command(
    name = "volprep",
    about = "volprep — clean price series and derive ARCH/GARCH inputs"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging (RUST_LOG overrides).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw index export and compute daily log returns.
    CleanIndex {
        /// Raw CSV export.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Dataset name; output is cleaned_<name>.csv.
        #[arg(long)]
        name: Option<String>,

        /// Directory for the cleaned CSV.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Metadata rows above the price table.
        #[arg(long)]
        preamble_rows: Option<usize>,

        /// Locate the price table instead of skipping a fixed row count.
        #[arg(long, default_value_t = false)]
        detect_header: bool,

        /// Skip chart rendering.
        #[arg(long, default_value_t = false)]
        no_plots: bool,

        /// Also write a Parquet copy.
        #[arg(long, default_value_t = false)]
        parquet: bool,
    },
    /// Fetch daily bars and write volatility features for ARCH/GARCH fitting.
    PrepareGarch {
        /// Market-data provider.
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,

        /// Ticker symbol (BRKa.N on Eikon, BRK-A on Yahoo).
        #[arg(long)]
        symbol: Option<String>,

        /// Calendar days of history ending today.
        #[arg(long)]
        lookback_days: Option<u32>,

        /// Output CSV path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write a Parquet copy.
        #[arg(long, default_value_t = false)]
        parquet: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Eikon,
    Yahoo,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Eikon => ProviderKind::Eikon,
            ProviderArg::Yahoo => ProviderKind::Yahoo,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config)?;

    match cli.command {
        Commands::CleanIndex {
            input,
            name,
            output_dir,
            preamble_rows,
            detect_header,
            no_plots,
            parquet,
        } => {
            let index = &mut config.index;
            if let Some(input) = input {
                index.input = input;
            }
            if let Some(name) = name {
                index.name = name;
            }
            if let Some(dir) = output_dir {
                index.output_dir = dir;
            }
            if let Some(rows) = preamble_rows {
                index.preamble_rows = rows;
            }
            index.detect_header |= detect_header;
            index.plots &= !no_plots;
            index.parquet |= parquet;
            config.validate().context("invalid options")?;

            let index = &config.index;
            let report = run_index(index)
                .with_context(|| format!("cleaning {}", index.input.display()))?;
            print_index_report(&report);
        }
        Commands::PrepareGarch {
            provider,
            symbol,
            lookback_days,
            output,
            parquet,
        } => {
            let garch = &mut config.garch;
            if let Some(provider) = provider {
                garch.provider = provider.into();
            }
            if let Some(symbol) = symbol {
                garch.symbol = symbol;
            }
            if let Some(days) = lookback_days {
                garch.lookback_days = days;
            }
            if let Some(output) = output {
                garch.output = output;
            }
            garch.parquet |= parquet;
            config.validate().context("invalid options")?;

            run_prepare_garch(&config.garch)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<VolprepConfig> {
    let config = match path {
        Some(path) => VolprepConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VolprepConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn build_provider(garch: &GarchConfig) -> Result<Box<dyn DataProvider>, DataError> {
    Ok(match garch.provider {
        ProviderKind::Eikon => {
            let key = garch.api_key.clone().unwrap_or_default();
            let url = garch.eikon_url.as_deref().unwrap_or(DEFAULT_PROXY_URL);
            Box::new(EikonProvider::with_proxy_url(key, url)?)
        }
        ProviderKind::Yahoo => Box::new(YahooProvider::new()?),
    })
}

fn run_prepare_garch(garch: &GarchConfig) -> Result<()> {
    let provider = match build_provider(garch) {
        Ok(provider) => provider,
        Err(e) => {
            error!(error = %e, "cannot set up data provider");
            println!("No data fetched for {}; nothing written.", garch.symbol);
            return Ok(());
        }
    };

    let today = chrono::Local::now().date_naive();
    let outcome = run_garch(provider.as_ref(), garch, today)
        .with_context(|| format!("preparing GARCH input for {}", garch.symbol))?;

    match outcome {
        PipelineOutcome::Completed(report) => print_garch_report(&report),
        PipelineOutcome::NoData => {
            println!("No data fetched for {}; nothing written.", garch.symbol);
        }
    }
    Ok(())
}

// ── Reporting ─────────────────────────────────────────────────────────

fn print_index_report(report: &IndexReport) {
    println!("{}", report.preview);
    println!();
    println!(
        "Cleaned {} rows ({} dropped incomplete, {} duplicate) → {}",
        report.rows,
        report.clean.dropped_missing,
        report.clean.dropped_duplicate,
        report.output.display()
    );
    if let Some(path) = &report.parquet {
        println!("Parquet copy: {}", path.display());
    }
    for chart in &report.charts {
        println!("Chart: {}", chart.display());
    }
}

fn print_garch_report(report: &GarchReport) {
    println!("{}", report.summary);
    println!(
        "Data from {} ({} to {}), {} rows → {}",
        report.source,
        report.window.start,
        report.window.end,
        report.rows,
        report.output.display()
    );
    if let Some(path) = &report.parquet {
        println!("Parquet copy: {}", path.display());
    }
}
