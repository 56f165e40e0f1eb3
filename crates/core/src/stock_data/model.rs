use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sanitized quote metadata. Field set varies per ticker.
pub type QuoteSnapshot = Map<String, Value>;

/// One sanitized trading day: `Date` plus OHLCV columns.
pub type HistoryRecord = Map<String, Value>;

/// Response envelope for a ticker. At most one half is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockData {
    pub info: QuoteSnapshot,
    pub history: Vec<HistoryRecord>,
}

impl StockData {
    pub fn new(info: QuoteSnapshot, history: Vec<HistoryRecord>) -> Self {
        Self { info, history }
    }

    /// True when neither info nor history carries anything.
    pub fn is_empty(&self) -> bool {
        self.info.is_empty() && self.history.is_empty()
    }
}
