use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct ErrorBody {
    pub code: u16,
    pub error: String,
}

/// OpenAPI shape of `stockdata_core::StockData`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct StockDataResponse {
    /// Quote metadata; field set varies per ticker.
    #[schema(value_type = Object)]
    pub info: serde_json::Value,
    /// Daily bars with `Date`, OHLCV, `Dividends` and `Stock Splits`.
    #[schema(value_type = Vec<Object>)]
    pub history: Vec<serde_json::Value>,
}
