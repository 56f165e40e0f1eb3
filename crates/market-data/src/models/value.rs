use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Quote metadata keyed by provider field name (e.g. `regularMarketPrice`).
pub type InfoMap = BTreeMap<String, RawValue>;

/// A value exactly as the provider handed it to us.
///
/// Nothing here is guaranteed to be representable in JSON: integers may be
/// wider than any JSON consumer accepts, floats may be NaN or infinite, and
/// missing data is reported with dedicated markers.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// Not-available marker.
    Missing,
    /// Not-a-time marker (a datetime slot with no value).
    NotATime,
    Bool(bool),
    /// Integers are kept wide so oversized provider values survive decoding.
    Int(i128),
    Float(f64),
    Text(String),
    /// Offset-aware datetime.
    DateTime(DateTime<FixedOffset>),
    /// Datetime without an offset. Treated as UTC.
    NaiveDateTime(NaiveDateTime),
    /// Array-like sequence.
    List(Vec<RawValue>),
    /// Nested object.
    Map(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// True for the missing-value markers, including a NaN float.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing | Self::NotATime => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Int(i128::from(value))
    }
}

impl From<u64> for RawValue {
    fn from(value: u64) -> Self {
        Self::Int(i128::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for RawValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Missing)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}
