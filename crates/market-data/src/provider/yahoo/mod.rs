//! Yahoo Finance market data provider.
//!
//! Chart data (daily bars) comes from the `yahoo_finance_api` connector.
//! Quote metadata comes from the quoteSummary endpoint, which needs a
//! cookie + crumb pair that is cached for the lifetime of the process.

mod models;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use reqwest::header;
use time::OffsetDateTime;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{DailyBar, InfoMap};
use crate::provider::MarketDataProvider;

pub use models::decode_value;
use models::YahooQuoteSummaryResponse;

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// quoteSummary modules that together make up the info map.
const INFO_MODULES: &str =
    "assetProfile,summaryDetail,defaultKeyStatistics,financialData,price,quoteType";

/// Range and interval used for the recent-history probe.
const RECENT_RANGE: &str = "5d";
const DAILY_INTERVAL: &str = "1d";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to initialize Yahoo connector: {}", e),
            )
        })?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { connector, client })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().map_err(|_| crumb_lock_poisoned())?;
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::provider(PROVIDER_ID, "Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to read crumb: {}", e)))?;

        if crumb.trim().is_empty() {
            return Err(MarketDataError::provider(PROVIDER_ID, "Yahoo returned an empty crumb"));
        }

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().map_err(|_| crumb_lock_poisoned())?;
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        if let Ok(mut guard) = YAHOO_CRUMB.write() {
            *guard = None;
        }
    }

    // ========================================================================
    // Info Fetching
    // ========================================================================

    /// Fetch the quoteSummary modules for a symbol, refreshing the crumb once
    /// if Yahoo reports it as expired.
    async fn fetch_quote_summary(&self, symbol: &str) -> Result<InfoMap, MarketDataError> {
        match self.fetch_quote_summary_once(symbol).await {
            Err(MarketDataError::ProviderError { message, .. }) if message == AUTH_EXPIRED => {
                debug!("Yahoo crumb expired, refreshing and retrying {}", symbol);
                self.fetch_quote_summary_once(symbol).await
            }
            other => other,
        }
    }

    async fn fetch_quote_summary_once(&self, symbol: &str) -> Result<InfoMap, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            encode(symbol),
            INFO_MODULES,
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("quoteSummary request failed: {}", e)))?;

        match response.status() {
            reqwest::StatusCode::UNAUTHORIZED => {
                self.clear_crumb();
                return Err(MarketDataError::provider(PROVIDER_ID, AUTH_EXPIRED));
            }
            reqwest::StatusCode::NOT_FOUND => {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
            }
            _ => {}
        }

        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to parse quoteSummary response: {}", e),
            )
        })?;

        if let Some(error) = data.quote_summary.error {
            debug!(
                "quoteSummary error for {}: {:?} {:?}",
                symbol, error.code, error.description
            );
        }

        let result = data
            .quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Ok(result.into_info())
    }

    // ========================================================================
    // History Fetching
    // ========================================================================

    /// Convert chrono DateTime<Utc> to time::OffsetDateTime for the Yahoo API.
    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(dt.timestamp())
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    /// Turn a chart response into daily bars. "No quotes" means an empty window.
    fn response_to_bars(
        &self,
        symbol: &str,
        response: yahoo::YResponse,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        match response.quotes() {
            Ok(quotes) => {
                let mut bars: Vec<DailyBar> = quotes.into_iter().map(yahoo_quote_to_bar).collect();
                let dividends: Vec<(i64, f64)> = response
                    .dividends()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|d| (d.date, d.amount))
                    .collect();
                let splits: Vec<(i64, f64)> = response
                    .splits()
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|s| s.denominator != 0.0)
                    .map(|s| (s.date, s.numerator / s.denominator))
                    .collect();
                attach_corporate_actions(&mut bars, &dividends, &splits);
                Ok(bars)
            }
            Err(yahoo::YahooError::NoQuotes) => {
                warn!("No quotes returned for '{}'", symbol);
                Ok(Vec::new())
            }
            Err(e) => Err(MarketDataError::provider(PROVIDER_ID, e.to_string())),
        }
    }
}

/// Marker message for an expired crumb; triggers one transparent retry.
const AUTH_EXPIRED: &str = "Yahoo authentication expired";

fn crumb_lock_poisoned() -> MarketDataError {
    MarketDataError::provider(PROVIDER_ID, "Yahoo crumb cache lock poisoned")
}

fn map_connector_error(symbol: &str, e: yahoo::YahooError) -> MarketDataError {
    if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
        MarketDataError::SymbolNotFound(symbol.to_string())
    } else {
        MarketDataError::provider(PROVIDER_ID, e.to_string())
    }
}

/// Convert a Yahoo quote to a daily bar.
fn yahoo_quote_to_bar(quote: yahoo::Quote) -> DailyBar {
    bar_from_parts(
        quote.timestamp as i64,
        [quote.open, quote.high, quote.low, quote.close],
        quote.volume,
    )
}

/// Prices are kept as-is, NaN included; an unusable epoch leaves the bar undated.
fn bar_from_parts(epoch: i64, [open, high, low, close]: [f64; 4], volume: u64) -> DailyBar {
    let timestamp = Utc.timestamp_opt(epoch, 0).single();
    if timestamp.is_none() {
        warn!("Invalid Yahoo bar timestamp: {}", epoch);
    }

    DailyBar {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
        dividends: 0.0,
        stock_splits: 0.0,
    }
}

/// Fill `dividends` and `stock_splits` from `(epoch, value)` events, matched
/// to bars by UTC trading day. Events on days without a bar are dropped.
fn attach_corporate_actions(bars: &mut [DailyBar], dividends: &[(i64, f64)], splits: &[(i64, f64)]) {
    let by_day = |events: &[(i64, f64)]| -> HashMap<NaiveDate, f64> {
        events
            .iter()
            .filter_map(|(epoch, value)| {
                Utc.timestamp_opt(*epoch, 0)
                    .single()
                    .map(|ts| (ts.date_naive(), *value))
            })
            .collect()
    };
    let dividends = by_day(dividends);
    let splits = by_day(splits);

    for bar in bars.iter_mut() {
        let Some(day) = bar.timestamp.map(|ts| ts.date_naive()) else {
            continue;
        };
        if let Some(amount) = dividends.get(&day) {
            bar.dividends = *amount;
        }
        if let Some(ratio) = splits.get(&day) {
            bar.stock_splits = *ratio;
        }
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_recent_history(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError> {
        debug!("Probing recent history for {} from Yahoo", symbol);

        let response = self
            .connector
            .get_quote_range(symbol, DAILY_INTERVAL, RECENT_RANGE)
            .await
            .map_err(|e| map_connector_error(symbol, e))?;

        self.response_to_bars(symbol, response)
    }

    async fn get_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        debug!(
            "Fetching historical quotes for {} from {} to {} from Yahoo",
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let response = self
            .connector
            .get_quote_history(
                symbol,
                Self::chrono_to_offset_datetime(start),
                Self::chrono_to_offset_datetime(end),
            )
            .await
            .map_err(|e| map_connector_error(symbol, e))?;

        self.response_to_bars(symbol, response)
    }

    async fn get_info(&self, symbol: &str) -> Result<InfoMap, MarketDataError> {
        debug!("Fetching quote info for {} from Yahoo", symbol);
        self.fetch_quote_summary(symbol).await
    }
}

// ============================================================================
// Tests
// ============================================================================
