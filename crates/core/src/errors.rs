//! Core error types for the stockdata service.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
///
/// Upstream and per-value conversion failures never surface here: the
/// service degrades them to empty data and the sanitizer to `null`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(String),
}
