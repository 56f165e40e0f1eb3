//! JSON sanitizing of provider values.
//!
//! Providers hand out values that JSON cannot carry as-is: NaN and infinite
//! floats, integers wider than what JSON consumers can represent, datetimes
//! with arbitrary offsets and dedicated missing-value markers. Everything
//! here maps those onto plain JSON, using `null` for anything that has no
//! faithful representation.

use std::borrow::Borrow;

use chrono::{Datelike, NaiveDateTime};
use log::{error, warn};
use serde_json::{Map, Number, Value};
use stockdata_market_data::RawValue;
use thiserror::Error;

use crate::constants::{MAX_INTEGER_MAGNITUDE, UTC_DATETIME_FORMAT};

/// Errors raised for values that cannot be converted at all.
#[derive(Error, Debug, PartialEq)]
pub enum SanitizeError {
    /// ISO-8601 output needs a four digit year.
    #[error("Datetime {0} is outside the representable year range")]
    DateTimeOutOfRange(NaiveDateTime),
}

/// Convert one provider value into its JSON-legal equivalent.
///
/// Lists and nested objects are converted element by element. An element
/// that cannot be converted becomes `null` in place, so containers keep
/// their length and keys; only a failing scalar returns an error.
pub fn sanitize_value(value: &RawValue) -> Result<Value, SanitizeError> {
    match value {
        RawValue::List(items) => Ok(Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| sanitize_field(&format!("[{}]", index), item))
                .collect(),
        )),
        RawValue::Map(fields) => Ok(Value::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), sanitize_field(key, field)))
                .collect(),
        )),
        RawValue::Missing | RawValue::NotATime => Ok(Value::Null),
        RawValue::Int(i) => Ok(sanitize_int(*i)),
        RawValue::Float(f) => Ok(sanitize_float(*f)),
        RawValue::Bool(b) => Ok(Value::Bool(*b)),
        RawValue::Text(s) => Ok(Value::String(s.clone())),
        RawValue::DateTime(dt) => format_utc(dt.naive_utc()),
        RawValue::NaiveDateTime(dt) => format_utc(*dt),
    }
}

/// Convert one named field, replacing failures with `null`.
///
/// A bad field is logged and dropped to `null`; it never fails the response.
pub fn sanitize_field(key: &str, value: &RawValue) -> Value {
    match sanitize_value(value) {
        Ok(converted) => converted,
        Err(e) => {
            error!("Error converting field '{}': {}", key, e);
            Value::Null
        }
    }
}

/// Convert every field of a record (an info map or a history row).
pub fn sanitize_record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Map<String, Value>
where
    K: Into<String>,
    V: Borrow<RawValue>,
{
    fields
        .into_iter()
        .map(|(key, value)| {
            let key = key.into();
            let converted = sanitize_field(&key, value.borrow());
            (key, converted)
        })
        .collect()
}

fn sanitize_int(value: i128) -> Value {
    if value.unsigned_abs() > MAX_INTEGER_MAGNITUDE {
        warn!("Large integer detected: {}, converting to null.", value);
        return Value::Null;
    }
    // Within the magnitude bound every value fits in an i64.
    i64::try_from(value).map(Value::from).unwrap_or(Value::Null)
}

fn sanitize_float(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// `dt` must already be in UTC.
fn format_utc(dt: NaiveDateTime) -> Result<Value, SanitizeError> {
    if !(0..=9999).contains(&dt.year()) {
        return Err(SanitizeError::DateTimeOutOfRange(dt));
    }
    Ok(Value::String(dt.format(UTC_DATETIME_FORMAT).to_string()))
}
