use std::sync::Arc;

use stockdata_core::{StockDataService, StockDataServiceTrait};
use stockdata_market_data::{MarketDataProvider, YahooProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub stock_data_service: Arc<dyn StockDataServiceTrait + Send + Sync>,
}

impl AppState {
    pub fn new(stock_data_service: Arc<dyn StockDataServiceTrait + Send + Sync>) -> Self {
        Self { stock_data_service }
    }
}

pub fn init_tracing() {
    let log_format =
        std::env::var("STOCKDATA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new()?);
    Ok(state_with_provider(provider, config))
}

/// Wire `provider` into the stock data service using the configured deadlines.
pub fn state_with_provider(provider: Arc<dyn MarketDataProvider>, config: &Config) -> Arc<AppState> {
    tracing::info!(
        "Market data provider: {} (upstream timeout {} ms)",
        provider.id(),
        config.upstream_timeout.as_millis()
    );

    let stock_data_service: Arc<dyn StockDataServiceTrait + Send + Sync> = Arc::new(
        StockDataService::new(provider).with_upstream_timeout(config.upstream_timeout),
    );

    Arc::new(AppState::new(stock_data_service))
}
