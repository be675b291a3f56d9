//! Column schemas for the raw index export and both output files.

/// Names assigned to the raw index export columns, in file order.
pub const INDEX_RAW_COLUMNS: [&str; 8] = [
    "Exchange_Date",
    "Close",
    "High",
    "Low",
    "Open",
    "Column6",
    "Column7",
    "Column8",
];

/// Output columns of the cleaned index file, in order.
pub const INDEX_OUTPUT_COLUMNS: [&str; 6] =
    ["Exchange_Date", "Close", "High", "Low", "Open", "Log_Returns"];

/// Output columns of the GARCH input file, in order.
pub const GARCH_OUTPUT_COLUMNS: [&str; 11] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Adj_Close",
    "Return",
    "Return_Squared",
    "Rolling_Volatility",
    "Abs_Return",
];

/// Positions of the retained price columns within a raw index row.
///
/// The export puts close before high/low/open, which is easy to misread;
/// everything downstream addresses fields through this mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSchema {
    pub date: usize,
    pub close: usize,
    pub high: usize,
    pub low: usize,
    pub open: usize,
}

impl IndexSchema {
    /// Layout of the terminal's index price-history export.
    pub const fn terminal_export() -> Self {
        Self {
            date: 0,
            close: 1,
            high: 2,
            low: 3,
            open: 4,
        }
    }

    /// Names of the retained columns, in file order.
    pub fn retained_columns(&self) -> Vec<&'static str> {
        let mut positions = [self.date, self.close, self.high, self.low, self.open];
        positions.sort_unstable();
        positions
            .iter()
            .filter_map(|&i| INDEX_RAW_COLUMNS.get(i).copied())
            .collect()
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::terminal_export()
    }
}
