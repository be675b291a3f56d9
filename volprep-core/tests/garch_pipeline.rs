//! GARCH input preparation with mock providers.

use chrono::{Duration, NaiveDate};
use std::path::Path;
use volprep_core::config::GarchConfig;
use volprep_core::data::{DataError, DataProvider, DataSource, FetchResult, YahooProvider};
use volprep_core::domain::RawBar;
use volprep_core::output::meta_path;
use volprep_core::pipeline::run_garch;
use volprep_core::{PipelineError, PipelineOutcome};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

fn config_in(dir: &Path) -> GarchConfig {
    GarchConfig {
        output: dir.join("garch.csv"),
        ..GarchConfig::default()
    }
}

/// Provider that always fails.
struct Unreachable;

impl DataProvider for Unreachable {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn fetch(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
        Err(DataError::NetworkUnreachable("connection refused".into()))
    }
}

/// Provider that succeeds with no rows.
struct Empty;

impl DataProvider for Empty {
    fn name(&self) -> &str {
        "empty"
    }

    fn fetch(&self, symbol: &str, _: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: Vec::new(),
            source: DataSource::Eikon,
        })
    }
}

/// Provider serving `days` synthetic bars newest-first, with one bar
/// missing its volume.
struct Synthetic {
    days: usize,
}

impl DataProvider for Synthetic {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
        let mut bars: Vec<RawBar> = (0..self.days)
            .map(|i| {
                let close = 600_000.0 * (1.0 + 0.01 * ((i as f64) * 0.9).sin());
                RawBar {
                    date: Some(start + Duration::days(i as i64)),
                    open: Some(close * 0.998),
                    high: Some(close * 1.01),
                    low: Some(close * 0.99),
                    close: Some(close),
                    volume: Some(if i == 3 { f64::NAN } else { 250.0 + i as f64 }),
                }
            })
            .collect();
        bars.reverse();
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Eikon,
        })
    }
}

#[test]
fn fetch_failure_terminates_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let outcome = run_garch(&Unreachable, &config, today()).unwrap();

    assert!(matches!(outcome, PipelineOutcome::NoData));
    assert!(!config.output.exists());
    assert!(!meta_path(&config.output).exists());
}

#[test]
fn empty_fetch_terminates_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let outcome = run_garch(&Empty, &config, today()).unwrap();
    assert!(outcome.completed().is_none());
    assert!(!config.output.exists());
}

#[test]
fn unreachable_yahoo_endpoint_is_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let provider = YahooProvider::with_base_url("http://127.0.0.1:9/v8/finance/chart").unwrap();

    let outcome = run_garch(&provider, &config, today()).unwrap();
    assert!(matches!(outcome, PipelineOutcome::NoData));
    assert!(!config.output.exists());
}

#[test]
fn writes_feature_columns_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let report = run_garch(&Synthetic { days: 60 }, &config, today())
        .unwrap()
        .completed()
        .unwrap();

    // 60 bars, one dropped for missing volume, first of the rest has no return.
    assert_eq!(report.clean.dropped_missing, 1);
    assert_eq!(report.rows, 58);
    assert_eq!(report.source, DataSource::Eikon);
    assert_eq!(report.window.end, today());
    assert_eq!(report.window.start, today() - Duration::days(3650));

    let mut rdr = csv::Reader::from_path(&config.output).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        [
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
        ]
    );

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 58);
    assert!(rows[..19].iter().all(|r| r[9].is_empty()));
    assert!(rows[19..].iter().all(|r| !r[9].is_empty()));

    for row in &rows {
        let close: f64 = row[4].parse().unwrap();
        let adj: f64 = row[6].parse().unwrap();
        let ret: f64 = row[7].parse().unwrap();
        let sq: f64 = row[8].parse().unwrap();
        let abs: f64 = row[10].parse().unwrap();
        assert_eq!(close, adj);
        assert!((sq - ret * ret).abs() < 1e-15);
        assert!((abs - ret.abs()).abs() < 1e-15);
    }

    let dates: Vec<NaiveDate> = rows
        .iter()
        .map(|r| NaiveDate::parse_from_str(&r[0], "%Y-%m-%d").unwrap())
        .collect();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn summary_reports_missing_volatility() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let report = run_garch(&Synthetic { days: 40 }, &config, today())
        .unwrap()
        .completed()
        .unwrap();

    let missing: Vec<(&str, usize)> = report
        .summary
        .missing
        .iter()
        .map(|(name, n)| (name.as_str(), *n))
        .collect();
    assert!(missing.contains(&("Rolling_Volatility", 19)));
    assert!(missing.contains(&("Return", 0)));
    assert_eq!(report.summary.total_missing(), 19);

    let vol = report.summary.column("Rolling_Volatility").unwrap();
    assert_eq!(vol.count, report.rows - 19);
    assert!(vol.min > 0.0);

    let meta = report.meta.unwrap();
    assert_eq!(meta.source, "eikon");
    assert_eq!(meta.rows, report.rows);
}

#[test]
fn window_is_configurable() {
    let dir = tempfile::tempdir().unwrap();
    let config = GarchConfig {
        window: 5,
        write_meta: false,
        ..config_in(dir.path())
    };

    let report = run_garch(&Synthetic { days: 30 }, &config, today())
        .unwrap()
        .completed()
        .unwrap();
    assert_eq!(report.summary.total_missing(), 4);
    assert!(report.meta.is_none());
}

#[test]
fn out_of_range_lookback_fails_without_fetching() {
    let dir = tempfile::tempdir().unwrap();
    let config = GarchConfig {
        lookback_days: u32::MAX,
        ..config_in(dir.path())
    };

    let err = run_garch(&Synthetic { days: 30 }, &config, today()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::LookbackOutOfRange {
            lookback_days: u32::MAX,
            ..
        }
    ));
    assert!(!config.output.exists());
}
