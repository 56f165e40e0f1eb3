//! Fetch-and-assemble service.
//!
//! Every upstream failure is absorbed here: the probe, info and history
//! calls each degrade to "nothing" and only the combination of an empty info
//! map and an empty history turns into the not-found answer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use stockdata_market_data::{DailyBar, InfoMap, MarketDataError, MarketDataProvider};
use tokio::time::{timeout_at, Instant};

use super::model::{HistoryRecord, QuoteSnapshot, StockData};
use crate::constants::{DEFAULT_UPSTREAM_TIMEOUT, ESSENTIAL_INFO_FIELDS, HISTORY_LOOKBACK_DAYS};
use crate::errors::{Error, Result};
use crate::sanitize::sanitize_record;

/// Trim and upper-case a ticker. Blank input is a validation error.
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let normalized = ticker.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(Error::Validation("Ticker symbol is required".to_string()));
    }
    Ok(normalized)
}

#[async_trait]
pub trait StockDataServiceTrait: Send + Sync {
    /// Fetch and sanitize info plus one lookback window of daily history.
    ///
    /// Returns `Ok(None)` when nothing could be compiled for the ticker.
    /// The only error is a blank ticker.
    async fn get_stock_data(&self, ticker: &str) -> Result<Option<StockData>>;
}

pub struct StockDataService {
    provider: Arc<dyn MarketDataProvider>,
    history_days: i64,
    upstream_timeout: Duration,
}

impl StockDataService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            history_days: HISTORY_LOOKBACK_DAYS,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    /// Override the history lookback window.
    pub fn with_history_days(mut self, days: i64) -> Self {
        self.history_days = days;
        self
    }

    /// Bound all provider calls of one request by `timeout` in total.
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Run a provider call, failing it once `deadline` has passed.
    async fn within_deadline<T>(
        &self,
        deadline: Instant,
        call: impl Future<Output = std::result::Result<T, MarketDataError>>,
    ) -> std::result::Result<T, MarketDataError> {
        timeout_at(deadline, call).await.unwrap_or_else(|_| {
            Err(MarketDataError::provider(
                self.provider.id(),
                format!(
                    "no answer within {} ms",
                    self.upstream_timeout.as_millis()
                ),
            ))
        })
    }

    /// Probe recent history. `false` means an upstream failure that rules out
    /// any further fetching; an empty or unknown-symbol answer is only logged.
    async fn probe(&self, symbol: &str, deadline: Instant) -> bool {
        match self
            .within_deadline(deadline, self.provider.get_recent_history(symbol))
            .await
        {
            Ok(bars) if bars.is_empty() => {
                warn!(
                    "No recent history found for ticker '{}' via quick check. Attempting to fetch info directly.",
                    symbol
                );
                true
            }
            Ok(bars) => {
                debug!("Quick check for '{}' returned {} bars", symbol, bars.len());
                true
            }
            Err(e) if e.is_not_found() => {
                warn!("Quick check for '{}' found no data: {}", symbol, e);
                true
            }
            Err(e) => {
                error!(
                    "{} data error while probing {}: {}",
                    self.provider.id(),
                    symbol,
                    e
                );
                false
            }
        }
    }

    async fn fetch_info(&self, symbol: &str, deadline: Instant) -> InfoMap {
        match self.within_deadline(deadline, self.provider.get_info(symbol)).await {
            Ok(info) => {
                let has_essentials = ESSENTIAL_INFO_FIELDS
                    .iter()
                    .any(|key| info.get(*key).is_some_and(|v| !v.is_missing()));
                if !has_essentials {
                    warn!(
                        "Fetched info for '{}' seems incomplete or lacks essential data. It might be invalid/delisted.",
                        symbol
                    );
                }
                info
            }
            Err(e) => {
                error!(
                    "Failed to fetch info for {}: {}. Proceeding without info.",
                    symbol, e
                );
                InfoMap::new()
            }
        }
    }

    async fn fetch_history(&self, symbol: &str, deadline: Instant) -> Vec<DailyBar> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(self.history_days);
        match self
            .within_deadline(deadline, self.provider.get_history(symbol, start, end))
            .await
        {
            Ok(bars) => bars,
            Err(e) if e.is_not_found() => {
                warn!("No history available for {}: {}", symbol, e);
                Vec::new()
            }
            Err(e) => {
                error!("Failed to fetch history for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }
}

fn clean_info(symbol: &str, info: &InfoMap) -> QuoteSnapshot {
    if info.is_empty() {
        warn!("No 'info' data available or fetched for ticker {}", symbol);
        return QuoteSnapshot::new();
    }
    debug!(
        "Raw info keys for {}: {:?}",
        symbol,
        info.keys().collect::<Vec<_>>()
    );
    sanitize_record(info.iter().map(|(k, v)| (k.as_str(), v)))
}

fn clean_history(symbol: &str, bars: &[DailyBar]) -> Vec<HistoryRecord> {
    if bars.is_empty() {
        warn!(
            "No historical data found for ticker '{}' in the requested date range (or fetch failed).",
            symbol
        );
    }
    bars.iter().map(|bar| sanitize_record(bar.fields())).collect()
}

#[async_trait]
impl StockDataServiceTrait for StockDataService {
    async fn get_stock_data(&self, ticker: &str) -> Result<Option<StockData>> {
        let symbol = normalize_ticker(ticker)?;
        info!("Attempting to fetch data for ticker: {}", symbol);

        let deadline = Instant::now() + self.upstream_timeout;
        if !self.probe(&symbol, deadline).await {
            return Ok(None);
        }

        let info = self.fetch_info(&symbol, deadline).await;
        let bars = self.fetch_history(&symbol, deadline).await;

        let data = StockData::new(clean_info(&symbol, &info), clean_history(&symbol, &bars));
        if data.is_empty() {
            warn!(
                "No data (info or history) could be compiled for {}.",
                symbol
            );
            return Ok(None);
        }

        Ok(Some(data))
    }
}
