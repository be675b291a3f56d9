//! Domain types for volprep

pub mod record;

pub use record::{PriceRecord, RawBar, ReturnRecord, VolatilityRecord};
