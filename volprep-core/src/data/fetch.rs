//! Best-effort fetch: one provider call, errors become an empty result.

use super::provider::{DataProvider, DataSource};
use crate::domain::RawBar;
use chrono::{Duration, NaiveDate};
use tracing::{error, info};

/// Inclusive date range ending today and reaching back a fixed number of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// `None` when the start would fall outside the representable date range.
    pub fn trailing(today: NaiveDate, lookback_days: u32) -> Option<Self> {
        let start = today.checked_sub_signed(Duration::days(i64::from(lookback_days)))?;
        Some(Self { start, end: today })
    }
}

/// Bars from a best-effort fetch, plus where they came from when it succeeded.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub bars: Vec<RawBar>,
    pub source: Option<DataSource>,
}

impl Fetched {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Call the provider once. Any failure is logged and yields an empty result.
pub fn fetch_or_empty(provider: &dyn DataProvider, symbol: &str, window: FetchWindow) -> Fetched {
    info!(
        provider = provider.name(),
        symbol,
        start = %window.start,
        end = %window.end,
        "fetching daily bars"
    );

    match provider.fetch(symbol, window.start, window.end) {
        Ok(result) => {
            info!(symbol, rows = result.bars.len(), "fetch complete");
            Fetched {
                bars: result.bars,
                source: Some(result.source),
            }
        }
        Err(e) => {
            error!(provider = provider.name(), symbol, error = %e, "error fetching data");
            Fetched::default()
        }
    }
}
