//! Volatility features for ARCH/GARCH input.
//!
//! Rolling volatility: sample standard deviation (n-1) of the trailing
//! `window` returns, inclusive of the current one, times sqrt(periods_per_year).
//! Lookback: window - 1 records.

use crate::domain::{ReturnRecord, VolatilityRecord};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW: usize = 20;
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolatilityParams {
    pub window: usize,
    pub periods_per_year: u32,
}

impl VolatilityParams {
    pub fn annualization(&self) -> f64 {
        f64::from(self.periods_per_year).sqrt()
    }
}

impl Default for VolatilityParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

/// Trailing sample standard deviation; NaN until `window` values are available.
///
/// Windows containing NaN yield NaN. A window below 2 has no sample
/// deviation and yields all NaN.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window < 2 || n < window {
        return out;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out[i] = var.sqrt();
    }

    out
}

/// Derive squared return, rolling volatility and absolute return per record.
///
/// Adjusted close mirrors close: no split or dividend data is applied.
pub fn volatility_features(
    returns: Vec<ReturnRecord>,
    params: VolatilityParams,
) -> Vec<VolatilityRecord> {
    let series: Vec<f64> = returns.iter().map(|r| r.log_return).collect();
    let scale = params.annualization();
    let rolling = rolling_std(&series, params.window);

    returns
        .into_iter()
        .zip(rolling)
        .map(|(base, sd)| {
            let r = base.log_return;
            VolatilityRecord {
                adj_close: base.price.close,
                return_squared: r * r,
                rolling_volatility: (!sd.is_nan()).then_some(sd * scale),
                abs_return: r.abs(),
                base,
            }
        })
        .collect()
}
