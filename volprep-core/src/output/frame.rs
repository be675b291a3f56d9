//! Record → DataFrame conversion with the fixed output column orders.

use crate::data::schema::{GARCH_OUTPUT_COLUMNS, INDEX_OUTPUT_COLUMNS};
use crate::domain::{ReturnRecord, VolatilityRecord};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date_column(name: &str, dates: impl Iterator<Item = NaiveDate>) -> PolarsResult<Column> {
    let days: Vec<i32> = dates
        .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();
    Column::new(name.into(), days).cast(&DataType::Date)
}

fn f64_column(name: &str, values: Vec<f64>) -> Column {
    Column::new(name.into(), values)
}

/// Cleaned index frame: `Exchange_Date, Close, High, Low, Open, Log_Returns`.
pub fn index_frame(records: &[ReturnRecord]) -> PolarsResult<DataFrame> {
    let [date, close, high, low, open, log_ret] = INDEX_OUTPUT_COLUMNS;
    DataFrame::new(vec![
        date_column(date, records.iter().map(|r| r.price.date))?,
        f64_column(close, records.iter().map(|r| r.price.close).collect()),
        f64_column(high, records.iter().map(|r| r.price.high).collect()),
        f64_column(low, records.iter().map(|r| r.price.low).collect()),
        f64_column(open, records.iter().map(|r| r.price.open).collect()),
        f64_column(log_ret, records.iter().map(|r| r.log_return).collect()),
    ])
}

/// GARCH input frame in `GARCH_OUTPUT_COLUMNS` order.
pub fn garch_frame(records: &[VolatilityRecord]) -> PolarsResult<DataFrame> {
    let [date, open, high, low, close, volume, adj_close, ret, ret_sq, rolling_vol, abs_ret] =
        GARCH_OUTPUT_COLUMNS;
    let price = |f: fn(&VolatilityRecord) -> f64| records.iter().map(f).collect::<Vec<f64>>();

    let volumes: Vec<Option<f64>> = records.iter().map(|r| r.base.price.volume).collect();
    let rolling: Vec<Option<f64>> = records.iter().map(|r| r.rolling_volatility).collect();

    DataFrame::new(vec![
        date_column(date, records.iter().map(|r| r.date()))?,
        f64_column(open, price(|r| r.base.price.open)),
        f64_column(high, price(|r| r.base.price.high)),
        f64_column(low, price(|r| r.base.price.low)),
        f64_column(close, price(|r| r.base.price.close)),
        Column::new(volume.into(), volumes),
        f64_column(adj_close, price(|r| r.adj_close)),
        f64_column(ret, price(|r| r.base.log_return)),
        f64_column(ret_sq, price(|r| r.return_squared)),
        Column::new(rolling_vol.into(), rolling),
        f64_column(abs_ret, price(|r| r.abs_return)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceRecord;

    fn return_record(day: u32, close: f64, log_return: f64) -> ReturnRecord {
        ReturnRecord {
            price: PriceRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                open: close - 1.0,
                high: close + 1.0,
                low: close - 2.0,
                close,
                volume: Some(500.0),
            },
            log_return,
        }
    }

    #[test]
    fn index_frame_has_expected_columns() {
        let df = index_frame(&[return_record(3, 105.0, 0.05)]).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, INDEX_OUTPUT_COLUMNS.to_vec());
        assert_eq!(df.height(), 1);
        assert_eq!(df.column("Exchange_Date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn garch_frame_keeps_missing_volatility_as_null() {
        let records = vec![VolatilityRecord {
            base: return_record(3, 105.0, 0.05),
            adj_close: 105.0,
            return_squared: 0.0025,
            rolling_volatility: None,
            abs_return: 0.05,
        }];
        let df = garch_frame(&records).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, GARCH_OUTPUT_COLUMNS.to_vec());
        assert_eq!(df.column("Rolling_Volatility").unwrap().null_count(), 1);
        assert_eq!(df.column("Volume").unwrap().null_count(), 0);
    }

    #[test]
    fn epoch_offset_is_correct() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(epoch.num_days_from_ce(), UNIX_EPOCH_DAYS_FROM_CE);
    }
}
