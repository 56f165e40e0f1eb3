//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::{DailyBar, InfoMap};

/// Trait for upstream market data providers.
///
/// Implementations own all transport concerns (authentication, retries,
/// response decoding). Callers only see provider-native values.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO".
    fn id(&self) -> &'static str;

    /// Fetch the last few trading days of daily bars.
    ///
    /// Used as a cheap probe that a symbol exists and is trading.
    async fn get_recent_history(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError>;

    /// Fetch daily bars between `start` and `end`, ordered by timestamp ascending.
    async fn get_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyBar>, MarketDataError>;

    /// Fetch the quote metadata map (price, volume, company profile, ...).
    ///
    /// Which fields are present varies per symbol.
    async fn get_info(&self, symbol: &str) -> Result<InfoMap, MarketDataError>;
}
