//! Canonicalization: drop incomplete rows, sort by date, dedupe.
//!
//! Output guarantees: every record has all required fields, and dates are
//! strictly increasing. Return math downstream relies on both.

use crate::domain::{PriceRecord, RawBar};
use tracing::{info, warn};

/// Which optional columns are required to keep a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanOptions {
    pub require_volume: bool,
}

/// Row accounting for one canonicalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub input_rows: usize,
    pub dropped_missing: usize,
    pub dropped_duplicate: usize,
    pub inconsistent_kept: usize,
    pub kept: usize,
}

/// Canonicalizer for raw bars.
pub struct Canonicalizer;

impl Canonicalizer {
    /// Filter, sort and dedupe raw bars into validated records.
    ///
    /// Sorting is stable, so among rows sharing a date the first in input
    /// order survives.
    pub fn canonicalize(bars: Vec<RawBar>, opts: CleanOptions) -> (Vec<PriceRecord>, CleanReport) {
        let input_rows = bars.len();

        let mut records: Vec<PriceRecord> = bars
            .into_iter()
            .filter_map(|bar| bar.into_record(opts.require_volume))
            .collect();
        let dropped_missing = input_rows - records.len();

        records.sort_by_key(|r| r.date);
        let before_dedupe = records.len();
        records.dedup_by_key(|r| r.date);
        let dropped_duplicate = before_dedupe - records.len();

        let inconsistent_kept = records.iter().filter(|r| !r.is_consistent()).count();

        let report = CleanReport {
            input_rows,
            dropped_missing,
            dropped_duplicate,
            inconsistent_kept,
            kept: records.len(),
        };

        info!(
            input = report.input_rows,
            dropped_missing = report.dropped_missing,
            dropped_duplicate = report.dropped_duplicate,
            kept = report.kept,
            "canonicalized price rows"
        );
        if inconsistent_kept > 0 {
            warn!(
                count = inconsistent_kept,
                "rows with high/low outside open/close kept as-is"
            );
        }

        (records, report)
    }
}
