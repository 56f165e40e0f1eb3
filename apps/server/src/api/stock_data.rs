use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use stockdata_core::stock_data::normalize_ticker;
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ErrorBody, StockDataResponse},
};

const TICKER_REQUIRED: &str = "Ticker symbol is required";

/// Quote info plus one year of daily history for a ticker.
#[utoipa::path(
    get,
    path = "/api/stockdata/{ticker}",
    params(("ticker" = String, Path, description = "Ticker symbol, case-insensitive")),
    responses(
        (status = 200, description = "Info and history", body = StockDataResponse),
        (status = 400, description = "Blank ticker", body = ErrorBody),
        (status = 404, description = "No data for ticker", body = ErrorBody),
        (status = 500, description = "Serialization failure", body = ErrorBody),
    )
)]
pub async fn get_stock_data(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let symbol = normalize_ticker(&ticker).map_err(|_| {
        warn!("API call received without a valid ticker symbol.");
        ApiError::BadRequest(TICKER_REQUIRED.to_string())
    })?;

    info!("API request received for ticker: {}", symbol);
    let data = state
        .stock_data_service
        .get_stock_data(&symbol)
        .await?
        .ok_or_else(|| {
            warn!(
                "Failed to fetch or process data for ticker: {}. Returning 404.",
                symbol
            );
            ApiError::NotFound(format!(
                "No data found or error processing for ticker symbol: {}",
                symbol
            ))
        })?;

    let body = serde_json::to_vec(&data).map_err(|e| {
        error!(
            "Error serializing final data for {} to JSON: {}",
            symbol, e
        );
        ApiError::Internal("Internal server error during final data serialization".to_string())
    })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// `/api/stockdata/` with nothing after the slash.
async fn missing_ticker() -> ApiError {
    warn!("API call received without a valid ticker symbol.");
    ApiError::BadRequest(TICKER_REQUIRED.to_string())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stockdata/", get(missing_ticker))
        .route("/stockdata/{ticker}", get(get_stock_data))
}
