//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over market-data sources (Eikon, Yahoo
//! Finance) so the GARCH pipeline can swap implementations and mock for tests.

use crate::domain::RawBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structured error types for fetch operations.
///
/// None of these escape the fetch boundary: `fetch_or_empty` logs them and
/// hands the pipeline an empty result instead.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Classify a transport-level reqwest failure.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            DataError::NetworkUnreachable(err.to_string())
        } else {
            DataError::Other(err.to_string())
        }
    }
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Eikon,
    YahooFinance,
    CsvImport,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSource::Eikon => "eikon",
            DataSource::YahooFinance => "yahoo_finance",
            DataSource::CsvImport => "csv_import",
        };
        f.write_str(name)
    }
}

/// Trait for market-data providers.
///
/// Implementations make exactly one request per `fetch` call; there is no
/// retry layer above them.
pub trait DataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over an inclusive date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}
