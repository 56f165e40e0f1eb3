//! Stockdata Market Data Crate
//!
//! Upstream market data access for the stockdata proxy.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +----------------------+
//! |  Fetch service   | --> |  MarketDataProvider  |  (trait)
//! +------------------+     +----------------------+
//!                                    |
//!                                    v
//!                          +----------------------+
//!                          |    YahooProvider     |  (chart + quoteSummary)
//!                          +----------------------+
//!                                    |
//!                                    v
//!                          +----------------------+
//!                          | DailyBar / InfoMap   |  (RawValue, unsanitized)
//!                          +----------------------+
//! ```
//!
//! Values handed out by providers are provider-native [`RawValue`]s. They may
//! contain NaN, infinities, oversized integers and missing markers; turning
//! them into JSON is the caller's job.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{DailyBar, InfoMap, RawValue, HISTORY_COLUMNS};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
