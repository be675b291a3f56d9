//! Historical index cleaner: raw terminal export → cleaned CSV + two charts.

use super::{date_span, PipelineError};
use crate::config::IndexConfig;
use crate::data::{Canonicalizer, CleanOptions, CleanReport, DataSource, IndexIngestor, IndexSchema};
use crate::domain::ReturnRecord;
use crate::output::{index_frame, write_csv, write_meta, write_parquet, OutputMeta};
use crate::plot::{line_chart, LineChart};
use crate::transform::log_returns;
use plotters::style::{BLUE, RED};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::{info, warn};

pub const PREVIEW_ROWS: usize = 5;

/// What a clean-index run produced.
#[derive(Debug)]
pub struct IndexReport {
    pub output: PathBuf,
    pub rows: usize,
    pub preamble_rows: usize,
    pub clean: CleanReport,
    /// First cleaned rows, for display.
    pub preview: DataFrame,
    pub charts: Vec<PathBuf>,
    pub parquet: Option<PathBuf>,
    pub meta: Option<OutputMeta>,
}

pub fn run_index(config: &IndexConfig) -> Result<IndexReport, PipelineError> {
    let ingestor = IndexIngestor::new(IndexSchema::terminal_export(), config.preamble());
    let ingested = ingestor.ingest_csv(&config.input)?;

    let (records, clean) = Canonicalizer::canonicalize(
        ingested.bars,
        CleanOptions {
            require_volume: false,
        },
    );
    let returns = log_returns(&records);

    let mut df = index_frame(&returns)?;
    let output = config.output_path();
    write_csv(&mut df, &output)?;

    let parquet = if config.parquet {
        let path = output.with_extension("parquet");
        write_parquet(&mut df, &path)?;
        Some(path)
    } else {
        None
    };

    let meta = if config.write_meta {
        let span = date_span(&returns, ReturnRecord::date);
        Some(write_meta(&output, &df, span, &DataSource::CsvImport.to_string())?)
    } else {
        None
    };

    let charts = if !config.plots {
        Vec::new()
    } else if returns.is_empty() {
        warn!("no cleaned rows, skipping charts");
        Vec::new()
    } else {
        render_charts(config, &returns)?
    };

    info!(rows = returns.len(), output = %output.display(), "index cleaning complete");

    Ok(IndexReport {
        output,
        rows: returns.len(),
        preamble_rows: ingested.preamble_rows,
        clean,
        preview: df.head(Some(PREVIEW_ROWS)),
        charts,
        parquet,
        meta,
    })
}

fn render_charts(
    config: &IndexConfig,
    returns: &[ReturnRecord],
) -> Result<Vec<PathBuf>, PipelineError> {
    let close = LineChart {
        title: format!("{} Close Prices", config.label),
        x_label: "Date",
        y_label: "Close Price",
        series_label: "Close Price",
        color: BLUE,
        points: returns.iter().map(|r| (r.date(), r.price.close)).collect(),
    };
    line_chart(&config.close_chart, &close)?;

    let daily = LineChart {
        title: format!("{} Daily Returns", config.label),
        x_label: "Date",
        y_label: "Daily Log Returns",
        series_label: "Daily Log Returns",
        color: RED,
        points: returns.iter().map(|r| (r.date(), r.log_return)).collect(),
    };
    line_chart(&config.returns_chart, &daily)?;

    Ok(vec![config.close_chart.clone(), config.returns_chart.clone()])
}
