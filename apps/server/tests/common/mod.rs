#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use stockdata_market_data::{DailyBar, InfoMap, MarketDataError, MarketDataProvider, RawValue};
use stockdata_server::{api::app_router, config::Config, state_with_provider};
use tower::ServiceExt;

pub const FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Provider double that answers every ticker with the same canned data.
#[derive(Default)]
pub struct FakeProvider {
    pub info: InfoMap,
    pub bars: Vec<DailyBar>,
    pub fail: bool,
    pub delay: Duration,
    pub symbols: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn aapl() -> Self {
        let mut info = InfoMap::new();
        info.insert("symbol".to_string(), RawValue::from("AAPL"));
        info.insert("longName".to_string(), RawValue::from("Apple Inc."));
        info.insert("regularMarketPrice".to_string(), RawValue::Float(179.66));
        info.insert("trailingPE".to_string(), RawValue::Float(f64::INFINITY));
        info.insert(
            "companyOfficers".to_string(),
            RawValue::List(vec![RawValue::from("Tim Cook"), RawValue::Missing]),
        );

        let bars = vec![
            DailyBar {
                timestamp: Utc.with_ymd_and_hms(2024, 2, 29, 14, 30, 0).single(),
                open: 181.27,
                high: 182.57,
                low: 179.53,
                close: 180.75,
                volume: 136_682_600,
                ..Default::default()
            },
            DailyBar {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).single(),
                open: 179.55,
                high: 180.53,
                low: 177.38,
                close: 179.66,
                volume: 73_488_000,
                dividends: 0.24,
                ..Default::default()
            },
        ];

        Self {
            info,
            bars,
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Same data as [`FakeProvider::aapl`], but every call takes `delay`.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::aapl()
        }
    }

    async fn answer<T: Clone>(&self, symbol: &str, value: &T) -> Result<T, MarketDataError> {
        self.symbols.lock().unwrap().push(symbol.to_string());
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(MarketDataError::provider("FAKE", "upstream unavailable"));
        }
        Ok(value.clone())
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    fn id(&self) -> &'static str {
        "FAKE"
    }

    async fn get_recent_history(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError> {
        self.answer(symbol, &self.bars).await
    }

    async fn get_history(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        self.answer(symbol, &self.bars).await
    }

    async fn get_info(&self, symbol: &str) -> Result<InfoMap, MarketDataError> {
        self.answer(symbol, &self.info).await
    }
}

/// Required ports plus any `extra` variables.
pub fn test_config(extra: &[(&str, &str)]) -> Config {
    Config::from_vars(|key| match key {
        "FRONTEND_PORT" => Some("3000".to_string()),
        "BACKEND_PORT" => Some("5000".to_string()),
        _ => extra
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string()),
    })
    .unwrap()
}

pub fn build_test_router(provider: Arc<FakeProvider>) -> Router {
    build_test_router_with(provider, &test_config(&[]))
}

pub fn build_test_router_with(provider: Arc<FakeProvider>, config: &Config) -> Router {
    app_router(state_with_provider(provider, config), config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
