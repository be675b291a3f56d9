//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API with a single request.
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; it is the keyless alternative to the Eikon proxy.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::RawBar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the provider at a different chart endpoint (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(start_ts);
        format!(
            "{}/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d",
            self.base_url
        )
    }

    /// Parse the chart API response into raw bars.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let cell = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

        let bars = timestamps
            .iter()
            .enumerate()
            .map(|(i, &ts)| RawBar {
                date: chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.naive_utc().date()),
                open: cell(&quote.open, i),
                high: cell(&quote.high, i),
                low: cell(&quote.low, i),
                close: cell(&quote.close, i),
                volume: cell(&quote.volume, i),
            })
            .collect();

        Ok(bars)
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let url = self.chart_url(symbol, start, end);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(DataError::from_transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DataError::AuthenticationRequired(format!(
                "Yahoo Finance refused the request (HTTP {status})"
            )));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let bars = Self::parse_response(symbol, chart)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::YahooFinance,
        })
    }
}
