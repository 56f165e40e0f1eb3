//! Yahoo Finance API response models.
//!
//! The quoteSummary endpoint returns one JSON object per requested module.
//! Numeric fields are wrapped as `{"raw": 123.45, "fmt": "123.45"}`, dates as
//! `{"raw": 1699574400, "fmt": "2023-11-10"}`, and absent data as `{}`.

use chrono::{NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::{InfoMap, RawValue};

/// Keys Yahoo repeats in every module that carry no quote data.
const IGNORED_KEYS: &[&str] = &["maxAge"];

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container. `result` is `null` when the symbol is unknown.
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
pub struct YahooApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Individual result from quoteSummary API, one untyped object per module.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub quote_type: Option<Map<String, Value>>,
    pub price: Option<Map<String, Value>>,
    pub summary_detail: Option<Map<String, Value>>,
    pub default_key_statistics: Option<Map<String, Value>>,
    pub financial_data: Option<Map<String, Value>>,
    pub asset_profile: Option<Map<String, Value>>,
}

impl YahooQuoteSummaryResult {
    /// Flatten all modules into one info map.
    ///
    /// Modules are visited in declaration order and the first module that
    /// carries a key wins, so `quoteType.symbol` beats any later `symbol`.
    pub fn into_info(self) -> InfoMap {
        let modules = [
            self.quote_type,
            self.price,
            self.summary_detail,
            self.default_key_statistics,
            self.financial_data,
            self.asset_profile,
        ];

        let mut info = InfoMap::new();
        for module in modules.into_iter().flatten() {
            for (key, value) in module {
                if IGNORED_KEYS.contains(&key.as_str()) || info.contains_key(&key) {
                    continue;
                }
                info.insert(key, decode_value(&value));
            }
        }
        info
    }
}

/// Decode one quoteSummary JSON value into a provider-native value.
pub fn decode_value(value: &Value) -> RawValue {
    match value {
        Value::Null => RawValue::Missing,
        Value::Bool(b) => RawValue::Bool(*b),
        Value::Number(n) => decode_number(n),
        Value::String(s) => decode_string(s),
        Value::Array(items) => RawValue::List(items.iter().map(decode_value).collect()),
        Value::Object(map) => decode_object(map),
    }
}

fn decode_number(n: &serde_json::Number) -> RawValue {
    if let Some(i) = n.as_i64() {
        RawValue::Int(i128::from(i))
    } else if let Some(u) = n.as_u64() {
        RawValue::Int(i128::from(u))
    } else {
        n.as_f64().map(RawValue::Float).unwrap_or(RawValue::Missing)
    }
}

/// Yahoo spells non-finite raw numbers as strings.
fn decode_string(s: &str) -> RawValue {
    match s {
        "Infinity" => RawValue::Float(f64::INFINITY),
        "-Infinity" => RawValue::Float(f64::NEG_INFINITY),
        "NaN" => RawValue::Float(f64::NAN),
        _ => RawValue::Text(s.to_string()),
    }
}

fn decode_object(map: &Map<String, Value>) -> RawValue {
    if map.is_empty() {
        return RawValue::Missing;
    }

    if let Some(raw) = map.get("raw") {
        if let Some(date) = decode_epoch_date(raw, map.get("fmt")) {
            return date;
        }
        return decode_value(raw);
    }

    RawValue::Map(
        map.iter()
            .map(|(k, v)| (k.clone(), decode_value(v)))
            .collect(),
    )
}

/// `{"raw": <epoch>, "fmt": "YYYY-MM-DD"}` is how Yahoo encodes calendar dates.
fn decode_epoch_date(raw: &Value, fmt: Option<&Value>) -> Option<RawValue> {
    let fmt = fmt?.as_str()?;
    NaiveDate::parse_from_str(fmt, "%Y-%m-%d").ok()?;
    let epoch = raw.as_i64()?;
    Some(match Utc.timestamp_opt(epoch, 0).single() {
        Some(ts) => RawValue::from(ts),
        None => RawValue::NotATime,
    })
}
