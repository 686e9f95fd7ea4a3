// Metrics endpoint

use crate::core::error::MonitoringError;
use crate::core::state::AppState;
use crate::models::wire::ApiKeyQuery;
use crate::utils::auth::verify_api_key;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Returns JSON with scan counters and store sizes: total/accepted/
/// rejected/failed scans, cached codes and how many are spent, directory
/// sizes, attendance and access volumes, uptime.
///
/// Requires valid API key for authentication.
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
) -> Result<Response, MonitoringError> {
    if !verify_api_key(&params.api_key, &state.config.sync.api_key) {
        warn!("Unauthorized metrics access attempt");
        return Err(MonitoringError::InvalidApiKey);
    }

    let snapshot = state.metrics.get_snapshot(
        &state.code_ledger,
        &state.user_directory,
        &state.zone_registry,
        &state.attendance,
        &state.access_log,
    );

    Ok((StatusCode::OK, Json(snapshot)).into_response())
}
