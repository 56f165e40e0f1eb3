//! Ticker snapshot assembly.
//!
//! - [`model`] - Response envelope (StockData)
//! - [`service`] - Fetch-and-assemble service on top of a market data provider
//!
//! ```text
//! StockDataService → MarketDataProvider (probe, info, history)
//!        ↓
//!   sanitize::* → StockData { info, history }
//! ```

pub mod model;
pub mod service;


pub use model::{HistoryRecord, QuoteSnapshot, StockData};
pub use service::{normalize_ticker, StockDataService, StockDataServiceTrait};
