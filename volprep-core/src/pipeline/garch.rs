//! ARCH/GARCH input preparation: provider fetch → volatility features → CSV.

use super::{date_span, PipelineError, PipelineOutcome};
use crate::config::GarchConfig;
use crate::data::{fetch_or_empty, Canonicalizer, CleanOptions, CleanReport, DataProvider, DataSource, FetchWindow};
use crate::domain::VolatilityRecord;
use crate::output::{garch_frame, write_csv, write_meta, write_parquet, OutputMeta};
use crate::stats::{summarize, FrameSummary};
use crate::transform::{log_returns, volatility_features};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{info, warn};

/// What a prepare-garch run produced.
#[derive(Debug)]
pub struct GarchReport {
    pub output: PathBuf,
    pub rows: usize,
    pub source: DataSource,
    pub window: FetchWindow,
    pub clean: CleanReport,
    pub summary: FrameSummary,
    pub parquet: Option<PathBuf>,
    pub meta: Option<OutputMeta>,
}

/// Fetch `config.symbol` over the lookback window ending `today` and write
/// the feature CSV. A failed or empty fetch ends the run with `NoData`.
pub fn run_garch(
    provider: &dyn DataProvider,
    config: &GarchConfig,
    today: NaiveDate,
) -> Result<PipelineOutcome<GarchReport>, PipelineError> {
    let window = FetchWindow::trailing(today, config.lookback_days).ok_or(
        PipelineError::LookbackOutOfRange {
            lookback_days: config.lookback_days,
            today,
        },
    )?;
    let fetched = fetch_or_empty(provider, &config.symbol, window);

    let source = match fetched.source {
        Some(source) if !fetched.is_empty() => source,
        _ => {
            warn!(symbol = %config.symbol, "no data fetched, nothing written");
            return Ok(PipelineOutcome::NoData);
        }
    };

    let (records, clean) = Canonicalizer::canonicalize(
        fetched.bars,
        CleanOptions {
            require_volume: true,
        },
    );
    let features = volatility_features(log_returns(&records), config.volatility());

    let mut df = garch_frame(&features)?;
    let summary = summarize(&df)?;

    write_csv(&mut df, &config.output)?;

    let parquet = if config.parquet {
        let path = config.output.with_extension("parquet");
        write_parquet(&mut df, &path)?;
        Some(path)
    } else {
        None
    };

    let meta = if config.write_meta {
        let span = date_span(&features, VolatilityRecord::date);
        Some(write_meta(&config.output, &df, span, &source.to_string())?)
    } else {
        None
    };

    info!(
        symbol = %config.symbol,
        rows = features.len(),
        output = %config.output.display(),
        "GARCH input prepared"
    );

    Ok(PipelineOutcome::Completed(GarchReport {
        output: config.output.clone(),
        rows: features.len(),
        source,
        window,
        clean,
        summary,
        parquet,
        meta,
    }))
}
