//! Raw index export ingestion.
//!
//! Terminal price-history exports start with a block of free-form metadata
//! rows (instrument name, date range, currency, ...) before the price table.
//! The ingestor skips that preamble, maps the remaining rows through the
//! `IndexSchema` and coerces every cell, leaving validation to the canonicalizer.

use super::coerce::{coerce_date, coerce_number};
use super::schema::IndexSchema;
use crate::domain::RawBar;
use chrono::NaiveDate;
use csv::ByteRecord;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Rows of metadata above the price table in the terminal export.
pub const DEFAULT_PREAMBLE_ROWS: usize = 17;

const PREVIEW_ROWS: usize = 20;

/// How to find where the price table starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preamble {
    /// Skip exactly this many rows. A wrong count misaligns silently.
    Fixed(usize),
    /// Start at the first row whose date and close cells both parse.
    Detect,
}

impl Default for Preamble {
    fn default() -> Self {
        Preamble::Fixed(DEFAULT_PREAMBLE_ROWS)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no row with a parseable date and close price; cannot locate the data region")]
    NoDataRegion,
}

/// Rows recovered from a raw export.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub bars: Vec<RawBar>,
    /// Rows skipped as preamble.
    pub preamble_rows: usize,
    /// Names of the columns kept from each row, in file order.
    pub columns: Vec<&'static str>,
}

/// Reader for raw index exports.
#[derive(Debug, Clone, Default)]
pub struct IndexIngestor {
    schema: IndexSchema,
    preamble: Preamble,
}

impl IndexIngestor {
    pub fn new(schema: IndexSchema, preamble: Preamble) -> Self {
        Self { schema, preamble }
    }

    /// Ingest a raw export from disk.
    pub fn ingest_csv(&self, path: &Path) -> Result<IngestResult, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "reading raw index export");
        self.ingest_reader(file)
    }

    /// Ingest a raw export from any reader.
    pub fn ingest_reader<R: Read>(&self, reader: R) -> Result<IngestResult, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        // Byte records: a stray non-UTF-8 byte costs one cell, not the load.
        let mut rows = Vec::new();
        for record in rdr.byte_records() {
            rows.push(record?);
        }

        for (i, row) in rows.iter().take(PREVIEW_ROWS).enumerate() {
            let fields: Vec<Cow<'_, str>> = row.iter().map(String::from_utf8_lossy).collect();
            debug!(row = i, ?fields, "raw preview");
        }

        let preamble_rows = match self.preamble {
            Preamble::Fixed(n) => n,
            Preamble::Detect => self.detect_data_start(&rows)?,
        };
        let columns = self.schema.retained_columns();
        debug!(
            preamble_rows,
            total_rows = rows.len(),
            ?columns,
            "data region located"
        );

        let bars = rows
            .iter()
            .skip(preamble_rows)
            .map(|row| self.coerce_row(row))
            .collect();

        Ok(IngestResult {
            bars,
            preamble_rows,
            columns,
        })
    }

    fn detect_data_start(&self, rows: &[ByteRecord]) -> Result<usize, LoadError> {
        rows.iter()
            .position(|row| {
                let date = date_cell(row, self.schema.date);
                let close = number_cell(row, self.schema.close);
                date.is_some() && close.is_some()
            })
            .ok_or(LoadError::NoDataRegion)
    }

    fn coerce_row(&self, row: &ByteRecord) -> RawBar {
        let number = |idx: usize| number_cell(row, idx);
        RawBar {
            date: date_cell(row, self.schema.date),
            open: number(self.schema.open),
            high: number(self.schema.high),
            low: number(self.schema.low),
            close: number(self.schema.close),
            volume: None,
        }
    }
}

fn cell(row: &ByteRecord, idx: usize) -> Option<Cow<'_, str>> {
    row.get(idx).map(String::from_utf8_lossy)
}

fn number_cell(row: &ByteRecord, idx: usize) -> Option<f64> {
    cell(row, idx).and_then(|c| coerce_number(&c))
}

fn date_cell(row: &ByteRecord, idx: usize) -> Option<NaiveDate> {
    cell(row, idx).and_then(|c| coerce_date(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
S&P 500 Index,,,,,,,
Exchange Date,Close,High,Low,Open,Net,%Chg,Volume
2024-01-02,4742.83,4754.33,4722.67,4745.20,-27.00,-0.57%,
2024-01-03,4704.81,4729.29,4699.71,4725.07,-38.02,-0.80%,
";

    fn ingest(preamble: Preamble) -> Result<IngestResult, LoadError> {
        IndexIngestor::new(IndexSchema::terminal_export(), preamble)
            .ingest_reader(EXPORT.as_bytes())
    }

    #[test]
    fn fixed_preamble_skips_rows() {
        let result = ingest(Preamble::Fixed(2)).unwrap();
        assert_eq!(result.preamble_rows, 2);
        assert_eq!(result.bars.len(), 2);

        let first = &result.bars[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(first.close, Some(4742.83));
        assert_eq!(first.high, Some(4754.33));
        assert_eq!(first.low, Some(4722.67));
        assert_eq!(first.open, Some(4745.20));
        assert_eq!(first.volume, None);
    }

    #[test]
    fn reports_retained_columns() {
        let result = ingest(Preamble::Fixed(2)).unwrap();
        assert_eq!(
            result.columns,
            vec!["Exchange_Date", "Close", "High", "Low", "Open"]
        );
    }

    #[test]
    fn invalid_utf8_costs_only_the_cell() {
        let mut raw = b"Index \xff\xfe export,,\n".to_vec();
        raw.extend_from_slice(b"2024-01-02,4742.83,4754.33,4722.67,4745.20\n");
        raw.extend_from_slice(b"2024-01-03,47\xff04.81,4729.29,4699.71,4725.07\n");

        let result = IndexIngestor::new(IndexSchema::terminal_export(), Preamble::Fixed(1))
            .ingest_reader(raw.as_slice())
            .unwrap();

        assert_eq!(result.bars.len(), 2);
        assert_eq!(result.bars[0].close, Some(4742.83));
        assert_eq!(result.bars[1].close, None);
        assert_eq!(result.bars[1].high, Some(4729.29));
    }

    #[test]
    fn wrong_fixed_preamble_keeps_junk_rows() {
        let result = ingest(Preamble::Fixed(1)).unwrap();
        assert_eq!(result.bars.len(), 3);
        assert_eq!(result.bars[0].date, None);
        assert_eq!(result.bars[0].close, None);
    }

    #[test]
    fn detection_finds_first_price_row() {
        let result = ingest(Preamble::Detect).unwrap();
        assert_eq!(result.preamble_rows, 2);
        assert_eq!(result.bars.len(), 2);
    }

    #[test]
    fn detection_fails_without_prices() {
        let err = IndexIngestor::new(IndexSchema::terminal_export(), Preamble::Detect)
            .ingest_reader("a,b\nc,d\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, LoadError::NoDataRegion));
    }

    #[test]
    fn short_rows_yield_missing_fields() {
        let result = IndexIngestor::new(IndexSchema::terminal_export(), Preamble::Fixed(0))
            .ingest_reader("2024-01-02,4742.83\n".as_bytes())
            .unwrap();
        assert_eq!(result.bars[0].close, Some(4742.83));
        assert_eq!(result.bars[0].open, None);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = IndexIngestor::default()
            .ingest_csv(Path::new("/nonexistent/raw.csv"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/raw.csv"));
    }
}
