//! `GET /health`: liveness plus the model ids each tier resolves to.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health), components(schemas(HealthReport, TierModels)))]
pub struct HealthApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    /// `false` when no Gemini key is configured; chat requests will then fail.
    pub model_api_configured: bool,
    pub models: TierModels,
}

/// Model identifier behind each `model` form value.
#[derive(Debug, Serialize, ToSchema)]
pub struct TierModels {
    pub flash: String,
    pub pro: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is up", body = HealthReport)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    let catalog = state.assembler.catalog();
    Json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model_api_configured: !state.config.gemini_api_key.is_empty(),
        models: TierModels {
            flash: catalog.fast.clone(),
            pro: catalog.advanced.clone(),
        },
    })
}
