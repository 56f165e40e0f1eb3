//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that the fetch service talks to
//! - The Yahoo Finance implementation

mod traits;

pub mod yahoo;

pub use traits::MarketDataProvider;
