use std::sync::Arc;

use axum::{routing::get, Json, Router};

use crate::{main_lib::AppState, models::HealthResponse};

/// Liveness probe. Does not touch the upstream provider.
#[utoipa::path(get, path = "/health", responses((status = 200, description = "Health", body = HealthResponse)))]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
