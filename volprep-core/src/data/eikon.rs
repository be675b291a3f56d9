//! LSEG Eikon Data API provider.
//!
//! Talks to the Eikon desktop proxy (`/api/v1/data`), which relays requests to
//! the terminal session. The application key travels in `x-tr-applicationid`.
//! Time series come back as a table: a `fields` header plus `dataPoints` rows,
//! with upper-case column names (`TIMESTAMP`, `OPEN`, `CLOSE`, ...).

use super::coerce::{coerce_json_date, coerce_json_number};
use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::RawBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:9000/api/v1/data";

const FIELDS: [&str; 6] = ["TIMESTAMP", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"];

#[derive(Debug, Serialize)]
struct DataRequest<'a> {
    #[serde(rename = "Entity")]
    entity: Entity<'a>,
}

#[derive(Debug, Serialize)]
struct Entity<'a> {
    #[serde(rename = "E")]
    endpoint: &'a str,
    #[serde(rename = "W")]
    payload: TimeSeriesPayload<'a>,
}

#[derive(Debug, Serialize)]
struct TimeSeriesPayload<'a> {
    rics: Vec<&'a str>,
    fields: Vec<&'a str>,
    interval: &'a str,
    startdate: String,
    enddate: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSeriesResponse {
    timeseries_data: Option<Vec<TimeSeries>>,
    #[serde(rename = "ErrorCode")]
    error_code: Option<Value>,
    #[serde(rename = "ErrorMessage")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSeries {
    #[serde(default)]
    data_points: Vec<Vec<Value>>,
    #[serde(default)]
    fields: Vec<FieldSpec>,
    status_code: Option<String>,
    error_code: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FieldSpec {
    name: String,
}

/// Eikon Data API provider.
pub struct EikonProvider {
    client: reqwest::blocking::Client,
    proxy_url: String,
    app_key: String,
}

impl EikonProvider {
    pub fn new(app_key: impl Into<String>) -> Result<Self, DataError> {
        Self::with_proxy_url(app_key, DEFAULT_PROXY_URL)
    }

    pub fn with_proxy_url(
        app_key: impl Into<String>,
        proxy_url: impl Into<String>,
    ) -> Result<Self, DataError> {
        let app_key = app_key.into();
        if app_key.trim().is_empty() {
            return Err(DataError::AuthenticationRequired(
                "no Eikon application key configured".into(),
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            proxy_url: proxy_url.into(),
            app_key,
        })
    }

    fn request_body<'a>(symbol: &'a str, start: NaiveDate, end: NaiveDate) -> DataRequest<'a> {
        DataRequest {
            entity: Entity {
                endpoint: "TimeSeries",
                payload: TimeSeriesPayload {
                    rics: vec![symbol],
                    fields: FIELDS.to_vec(),
                    interval: "daily",
                    startdate: format!("{}T00:00:00", start.format("%Y-%m-%d")),
                    enddate: format!("{}T00:00:00", end.format("%Y-%m-%d")),
                },
            },
        }
    }

    /// Parse the time series table into raw bars, renaming by column header.
    fn parse_response(symbol: &str, resp: TimeSeriesResponse) -> Result<Vec<RawBar>, DataError> {
        if let Some(code) = resp.error_code {
            let message = resp.error_message.unwrap_or_default();
            return Err(match code.as_i64() {
                Some(401) | Some(403) => DataError::AuthenticationRequired(message),
                Some(429) => DataError::RateLimited {
                    retry_after_secs: 60,
                },
                _ => DataError::Other(format!("Eikon error {code}: {message}")),
            });
        }

        let series = resp
            .timeseries_data
            .and_then(|all| all.into_iter().next())
            .ok_or_else(|| DataError::ResponseFormatChanged("no timeseriesData".into()))?;

        if series.status_code.as_deref() == Some("Error") {
            let message = series.error_message.unwrap_or_default();
            return Err(match series.error_code.as_deref() {
                Some("TSIError") if message.contains("Invalid RIC") => DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                },
                Some(code) => DataError::Other(format!("{code}: {message}")),
                None => DataError::Other(message),
            });
        }

        let column = |name: &str| series.fields.iter().position(|f| f.name == name);
        let date_col = column("TIMESTAMP").ok_or_else(|| {
            DataError::ResponseFormatChanged("TIMESTAMP column missing".into())
        })?;
        let open_col = column("OPEN");
        let high_col = column("HIGH");
        let low_col = column("LOW");
        let close_col = column("CLOSE");
        let volume_col = column("VOLUME");

        let number = |row: &[Value], col: Option<usize>| {
            col.and_then(|c| row.get(c)).and_then(coerce_json_number)
        };

        let bars = series
            .data_points
            .iter()
            .map(|row| RawBar {
                date: row.get(date_col).and_then(coerce_json_date),
                open: number(row, open_col),
                high: number(row, high_col),
                low: number(row, low_col),
                close: number(row, close_col),
                volume: number(row, volume_col),
            })
            .collect();

        Ok(bars)
    }
}

impl DataProvider for EikonProvider {
    fn name(&self) -> &str {
        "eikon"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let body = Self::request_body(symbol, start, end);
        let resp = self
            .client
            .post(&self.proxy_url)
            .header("x-tr-applicationid", &self.app_key)
            .json(&body)
            .send()
            .map_err(DataError::from_transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DataError::AuthenticationRequired(format!(
                "Eikon proxy rejected the application key (HTTP {status})"
            )));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                retry_after_secs: 60,
            });
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        let parsed: TimeSeriesResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let bars = Self::parse_response(symbol, parsed)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Eikon,
        })
    }
}
