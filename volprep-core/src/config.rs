//! Run configuration, loaded from TOML. Every key is optional.
//!
//! ```toml
//! [index]
//! input = "data/s&p_500_10_year_raw.csv"
//! detect_header = true
//!
//! [garch]
//! provider = "yahoo"
//! symbol = "BRK-A"
//! window = 20
//! ```

use crate::data::ingest::{Preamble, DEFAULT_PREAMBLE_ROWS};
use crate::transform::volatility::{VolatilityParams, DEFAULT_WINDOW, TRADING_DAYS_PER_YEAR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound on `garch.lookback_days` (a century of calendar days).
pub const MAX_LOOKBACK_DAYS: u32 = 36_525;

/// Environment variable that overrides `garch.api_key`.
pub const API_KEY_ENV: &str = "VOLPREP_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolprepConfig {
    pub index: IndexConfig,
    pub garch: GarchConfig,
}

impl VolprepConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.garch.window < 2 {
            return Err(ConfigError::Invalid(format!(
                "garch.window must be at least 2, got {}",
                self.garch.window
            )));
        }
        if self.garch.periods_per_year == 0 {
            return Err(ConfigError::Invalid(
                "garch.periods_per_year must be positive".into(),
            ));
        }
        if self.garch.lookback_days == 0 || self.garch.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::Invalid(format!(
                "garch.lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}, got {}",
                self.garch.lookback_days
            )));
        }
        if self.index.name.trim().is_empty() {
            return Err(ConfigError::Invalid("index.name must not be empty".into()));
        }
        Ok(())
    }

    /// Apply the API key environment override.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.garch.api_key = Some(key);
            }
        }
        self
    }
}

// ── Pipeline A ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub input: PathBuf,
    /// Dataset name; output file is `cleaned_<name>.csv`.
    pub name: String,
    pub output_dir: PathBuf,
    pub preamble_rows: usize,
    pub detect_header: bool,
    /// Series label used in chart titles.
    pub label: String,
    pub close_chart: PathBuf,
    pub returns_chart: PathBuf,
    pub plots: bool,
    pub parquet: bool,
    pub write_meta: bool,
}

impl IndexConfig {
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("cleaned_{}.csv", self.name))
    }

    pub fn preamble(&self) -> Preamble {
        if self.detect_header {
            Preamble::Detect
        } else {
            Preamble::Fixed(self.preamble_rows)
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/s&p_500_10_year_raw.csv"),
            name: "s&p_500_data".into(),
            output_dir: PathBuf::from("."),
            preamble_rows: DEFAULT_PREAMBLE_ROWS,
            detect_header: false,
            label: "S&P 500".into(),
            close_chart: PathBuf::from("graphics/s&p500_close_prices.svg"),
            returns_chart: PathBuf::from("graphics/s&p500_daily_log_returns.svg"),
            plots: true,
            parquet: false,
            write_meta: true,
        }
    }
}

// ── Pipeline B ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Eikon,
    Yahoo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarchConfig {
    pub provider: ProviderKind,
    pub symbol: String,
    pub lookback_days: u32,
    pub api_key: Option<String>,
    /// Eikon proxy endpoint; `None` uses the local default.
    pub eikon_url: Option<String>,
    pub output: PathBuf,
    pub window: usize,
    pub periods_per_year: u32,
    pub parquet: bool,
    pub write_meta: bool,
}

impl GarchConfig {
    pub fn volatility(&self) -> VolatilityParams {
        VolatilityParams {
            window: self.window,
            periods_per_year: self.periods_per_year,
        }
    }
}

impl Default for GarchConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Eikon,
            symbol: "BRKa.N".into(),
            lookback_days: 3650,
            api_key: None,
            eikon_url: None,
            output: PathBuf::from("berkshire_data_for_arch_garch.csv"),
            window: DEFAULT_WINDOW,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            parquet: false,
            write_meta: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = VolprepConfig::from_toml("").unwrap();
        assert_eq!(config, VolprepConfig::default());
        assert_eq!(config.index.preamble(), Preamble::Fixed(17));
        assert_eq!(
            config.index.output_path(),
            PathBuf::from("./cleaned_s&p_500_data.csv")
        );
        assert_eq!(config.garch.symbol, "BRKa.N");
        assert_eq!(config.garch.volatility(), VolatilityParams::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = VolprepConfig::from_toml(
            r#"
            [index]
            detect_header = true
            name = "nasdaq"

            [garch]
            provider = "yahoo"
            symbol = "BRK-A"
            window = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.index.preamble(), Preamble::Detect);
        assert_eq!(config.index.label, "S&P 500");
        assert_eq!(config.garch.provider, ProviderKind::Yahoo);
        assert_eq!(config.garch.window, 10);
        assert_eq!(config.garch.lookback_days, 3650);
    }

    #[test]
    fn window_below_two_is_rejected() {
        let err = VolprepConfig::from_toml("[garch]\nwindow = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn lookback_out_of_range_is_rejected() {
        let err = VolprepConfig::from_toml("[garch]\nlookback_days = 4294967295\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let mut config = VolprepConfig::default();
        config.garch.lookback_days = 0;
        assert!(config.validate().is_err());
        config.garch.lookback_days = MAX_LOOKBACK_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut config = VolprepConfig::default();
        config.index.name = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_provider_is_a_parse_error() {
        let err = VolprepConfig::from_toml("[garch]\nprovider = \"bloomberg\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = VolprepConfig::from_file(Path::new("/nonexistent/volprep.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
