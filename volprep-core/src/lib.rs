//! volprep core — data preparation for volatility modeling.
//!
//! This crate contains:
//! - Domain types (raw bars, validated price records, return and volatility records)
//! - Raw export ingestion and market-data providers (Eikon proxy, Yahoo)
//! - Coercion and canonicalization (drop incomplete rows, sort, dedupe)
//! - Log returns and rolling annualized volatility
//! - Frame output (CSV, Parquet, provenance sidecar), summary statistics, charts
//! - The two pipelines: index cleaning and GARCH input preparation

pub mod config;
pub mod data;
pub mod domain;
pub mod output;
pub mod pipeline;
pub mod plot;
pub mod stats;
pub mod transform;

pub use config::VolprepConfig;
pub use pipeline::{PipelineError, PipelineOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: records, reports and providers cross threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::RawBar>();
        require_sync::<domain::RawBar>();
        require_send::<domain::PriceRecord>();
        require_sync::<domain::PriceRecord>();
        require_send::<domain::ReturnRecord>();
        require_sync::<domain::ReturnRecord>();
        require_send::<domain::VolatilityRecord>();
        require_sync::<domain::VolatilityRecord>();

        require_send::<data::CleanReport>();
        require_sync::<data::CleanReport>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::EikonProvider>();
        require_sync::<data::EikonProvider>();

        require_send::<config::VolprepConfig>();
        require_sync::<config::VolprepConfig>();
        require_send::<stats::FrameSummary>();
        require_sync::<stats::FrameSummary>();
    }

    /// Compile-time check: providers coerce to `dyn DataProvider`.
    #[allow(dead_code)]
    fn assert_object_safe() {
        fn require_dyn(_: &dyn data::DataProvider) {}
        fn coerce<P: data::DataProvider>(provider: &P) {
            require_dyn(provider);
        }

        let _ = coerce::<data::YahooProvider>;
        let _ = coerce::<data::EikonProvider>;
    }
}
