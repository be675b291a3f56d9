//! Log returns.
//!
//! r[t] = ln(close[t] / close[t-1])
//! Lookback: 1 bar. The first record has no previous close and is dropped.

use crate::domain::{PriceRecord, ReturnRecord};

/// Attach log returns to date-sorted records, dropping the first record.
///
/// Records must already be canonicalized (ascending, unique dates).
pub fn log_returns(records: &[PriceRecord]) -> Vec<ReturnRecord> {
    debug_assert!(
        records.windows(2).all(|w| w[0].date < w[1].date),
        "records must be sorted by strictly increasing date"
    );

    records
        .windows(2)
        .map(|pair| ReturnRecord {
            price: pair[1].clone(),
            log_return: (pair[1].close / pair[0].close).ln(),
        })
        .collect()
}
