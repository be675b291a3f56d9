//! Summary statistics — count/mean/std/quartiles per numeric column, plus
//! missing-value counts for every column.
//!
//! Quantiles interpolate linearly between order statistics; std uses the
//! n-1 denominator. Undefined values (empty column, std of one value) are NaN.

use polars::prelude::*;
use std::fmt::{self, Write as _};

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

/// Statistics for a whole frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub columns: Vec<ColumnSummary>,
    /// Missing values per column, in frame order (non-numeric columns included).
    pub missing: Vec<(String, usize)>,
}

impl FrameSummary {
    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|(_, n)| n).sum()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Render the descriptive statistics table.
    pub fn describe_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<20}{:>8}{:>16}{:>16}{:>16}{:>16}{:>16}{:>16}{:>16}",
            "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        for c in &self.columns {
            let _ = writeln!(
                out,
                "{:<20}{:>8}{:>16.6}{:>16.6}{:>16.6}{:>16.6}{:>16.6}{:>16.6}{:>16.6}",
                c.name, c.count, c.mean, c.std, c.min, c.q25, c.q50, c.q75, c.max
            );
        }
        out
    }

    /// Render the missing-value table.
    pub fn missing_table(&self) -> String {
        let mut out = String::new();
        for (name, n) in &self.missing {
            let _ = writeln!(out, "{name:<20}{n:>8}");
        }
        out
    }
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data Summary:")?;
        write!(f, "{}", self.describe_table())?;
        writeln!(f)?;
        writeln!(f, "Missing Values:")?;
        write!(f, "{}", self.missing_table())
    }
}

/// Summarize every Float64 column and count nulls in all columns.
pub fn summarize(df: &DataFrame) -> PolarsResult<FrameSummary> {
    let mut columns = Vec::new();
    let mut missing = Vec::new();

    for col in df.get_columns() {
        let name = col.name().to_string();
        missing.push((name.clone(), col.null_count()));

        if col.dtype() == &DataType::Float64 {
            let values: Vec<f64> = col.f64()?.into_iter().flatten().collect();
            columns.push(describe(&name, &values));
        }
    }

    Ok(FrameSummary { columns, missing })
}

/// Descriptive statistics over present values.
pub fn describe(name: &str, values: &[f64]) -> ColumnSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    ColumnSummary {
        name: name.to_string(),
        count: values.len(),
        mean: mean(values),
        std: sample_std(values),
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.50),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

// ── Individual statistics ─────────────────────────────────────────────

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

/// Linearly interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
