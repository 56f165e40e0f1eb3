use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::RawValue;

/// Column names of a history row, in output order.
pub const HISTORY_COLUMNS: [&str; 8] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock Splits",
];

/// One trading day of price history.
///
/// `dividends` and `stock_splits` are 0.0 on days without a corporate action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Bar timestamp. `None` when the provider's epoch could not be interpreted.
    pub timestamp: Option<DateTime<Utc>>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Cash dividend per share going ex on this day.
    pub dividends: f64,
    /// Split ratio effective on this day, e.g. 4.0 for a 4:1 split.
    pub stock_splits: f64,
}

impl DailyBar {
    /// The bar as ordered `(column, value)` pairs, ready for sanitizing.
    pub fn fields(&self) -> Vec<(&'static str, RawValue)> {
        let date = match self.timestamp {
            Some(ts) => RawValue::from(ts),
            None => RawValue::NotATime,
        };
        let [date_col, open_col, high_col, low_col, close_col, volume_col, dividends_col, splits_col] =
            HISTORY_COLUMNS;
        vec![
            (date_col, date),
            (open_col, RawValue::Float(self.open)),
            (high_col, RawValue::Float(self.high)),
            (low_col, RawValue::Float(self.low)),
            (close_col, RawValue::Float(self.close)),
            (volume_col, RawValue::from(self.volume)),
            (dividends_col, RawValue::Float(self.dividends)),
            (splits_col, RawValue::Float(self.stock_splits)),
        ]
    }
}
