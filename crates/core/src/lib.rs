//! Stockdata Core - ticker snapshot assembly and JSON sanitizing.
//!
//! This crate turns provider-native market data into JSON-safe responses.
//! It does not know about HTTP; the server crate maps its results onto
//! status codes.

pub mod constants;
pub mod errors;
pub mod sanitize;
pub mod stock_data;

pub use stock_data::{StockData, StockDataService, StockDataServiceTrait};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
