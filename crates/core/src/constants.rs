use std::time::Duration;

/// Days of daily history returned with every quote snapshot
pub const HISTORY_LOOKBACK_DAYS: i64 = 365;

/// Integers whose magnitude exceeds this are replaced by null
pub const MAX_INTEGER_MAGNITUDE: u128 = 1_000_000_000_000_000_000;

/// ISO-8601 UTC layout used for every datetime in a response
pub const UTC_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Info fields of which at least one is expected for a live ticker
pub const ESSENTIAL_INFO_FIELDS: [&str; 3] = ["regularMarketPrice", "currentPrice", "symbol"];

/// Default deadline for all provider calls of one request
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(25);
