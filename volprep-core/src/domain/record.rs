//! Price records — the single entity every pipeline stage passes along.
//!
//! A row moves through four shapes:
//! `RawBar` (coerced, may have holes) → `PriceRecord` (validated) →
//! `ReturnRecord` (has a log return) → `VolatilityRecord` (GARCH features).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A daily row after type coercion but before filtering.
///
/// `None` is the missing marker: the source value was absent or did not parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawBar {
    /// Convert into a validated record, or `None` if a required field is missing.
    ///
    /// Prices must be finite and strictly positive; a log return of anything
    /// else is undefined. Volume is required only when `require_volume` is set,
    /// and a negative volume counts as missing.
    pub fn into_record(self, require_volume: bool) -> Option<PriceRecord> {
        let volume = self.volume.filter(|v| v.is_finite() && *v >= 0.0);
        if require_volume && volume.is_none() {
            return None;
        }
        Some(PriceRecord {
            date: self.date?,
            open: positive(self.open)?,
            high: positive(self.high)?,
            low: positive(self.low)?,
            close: positive(self.close)?,
            volume,
        })
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Validated daily OHLC(V) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl PriceRecord {
    /// OHLC consistency: high is the top of the bar and low the bottom.
    ///
    /// Not enforced by cleaning (terminal exports occasionally carry
    /// inconsistent bars); exposed for reporting.
    pub fn is_consistent(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// A price record with its log return against the previous record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub price: PriceRecord,
    pub log_return: f64,
}

impl ReturnRecord {
    pub fn date(&self) -> NaiveDate {
        self.price.date
    }
}

/// A return record enriched with the volatility features GARCH fitting uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRecord {
    pub base: ReturnRecord,
    /// Close with split/dividend adjustment; currently mirrors `close`.
    pub adj_close: f64,
    pub return_squared: f64,
    /// Annualized trailing standard deviation; `None` until the window is full.
    pub rolling_volatility: Option<f64>,
    pub abs_return: f64,
}

impl VolatilityRecord {
    pub fn date(&self) -> NaiveDate {
        self.base.price.date
    }

    pub fn log_return(&self) -> f64 {
        self.base.log_return
    }
}
