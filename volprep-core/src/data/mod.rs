//! Data ingestion: raw exports, market-data providers, coercion and cleaning

pub mod canonicalize;
pub mod coerce;
pub mod eikon;
pub mod fetch;
pub mod ingest;
pub mod provider;
pub mod schema;
pub mod yahoo;

pub use canonicalize::{Canonicalizer, CleanOptions, CleanReport};
pub use eikon::EikonProvider;
pub use fetch::{fetch_or_empty, FetchWindow, Fetched};
pub use ingest::{IndexIngestor, IngestResult, LoadError, Preamble};
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use schema::IndexSchema;
pub use yahoo::YahooProvider;
