//! Market data models
//!
//! - `value` - Provider-native values before any JSON sanitizing (RawValue, InfoMap)
//! - `bar` - Daily OHLCV history bars (DailyBar)

mod bar;
mod value;

pub use bar::{DailyBar, HISTORY_COLUMNS};
pub use value::{InfoMap, RawValue};
