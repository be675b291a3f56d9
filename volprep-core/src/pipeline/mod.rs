//! End-to-end pipelines: raw source → cleaned records → derived frame → files.

pub mod garch;
pub mod index;

pub use garch::{run_garch, GarchReport};
pub use index::{run_index, IndexReport};

use crate::data::LoadError;
use crate::output::OutputError;
use crate::plot::PlotError;
use chrono::NaiveDate;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("dataframe error: {0}")]
    Frame(#[from] PolarsError),

    #[error("lookback of {lookback_days} days from {today} is outside the supported date range")]
    LookbackOutOfRange { lookback_days: u32, today: NaiveDate },
}

/// How a pipeline run ended when failure to obtain data is not an error.
#[derive(Debug)]
pub enum PipelineOutcome<T> {
    Completed(T),
    /// The source yielded nothing; no output was written.
    NoData,
}

impl<T> PipelineOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            PipelineOutcome::Completed(report) => Some(report),
            PipelineOutcome::NoData => None,
        }
    }
}

/// First and last date of a date-sorted sequence.
pub(crate) fn date_span<T>(
    records: &[T],
    date: impl Fn(&T) -> NaiveDate,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    (records.first().map(&date), records.last().map(&date))
}
