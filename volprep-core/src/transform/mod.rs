//! Derived columns: log returns and volatility features.
//!
//! `rolling_std` works on slices and uses NaN for positions without a value;
//! record-level functions turn those into dropped rows or `None`.

pub mod returns;
pub mod volatility;

pub use returns::log_returns;
pub use volatility::{rolling_std, volatility_features, VolatilityParams};
