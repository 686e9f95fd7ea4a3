use crate::access::recorder;
use crate::core::error::{AccessError, ValidationError};
use crate::core::state::AppState;
use crate::models::access::AccessEvent;
use crate::utils::time::now_local;
use crate::validation::params::RegistrarAccesoParams;
use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Serialize)]
struct RegistrarAccesoResponse {
    success: bool,
    data: AccessEvent,
}

/// Record an entrance/exit event
///
/// POST /registrar-acceso
///
/// Always terminal: the kiosk marks the code used right after a
/// successful response.
pub async fn registrar_acceso_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<RegistrarAccesoParams>,
) -> Result<Response, Response> {
    state.metrics.increment_scans();

    let validated = params.validate().map_err(|e: ValidationError| {
        warn!(error = %e, "Invalid access payload");
        state.metrics.increment_rejected();
        e.into_response()
    })?;

    let event = recorder::record(
        &state.zone_registry,
        &state.access_log,
        &state.wal,
        validated.user_id,
        validated.zone_id,
        validated.kind,
        now_local(),
    )
    .map_err(|e| {
        match &e {
            AccessError::UnknownZone(_) => state.metrics.increment_rejected(),
            AccessError::Store(_) => state.metrics.increment_failed(),
        }
        warn!(error = %e, "Access registration failed");
        e.into_response()
    })?;

    state.metrics.increment_accepted();

    Ok(Json(RegistrarAccesoResponse {
        success: true,
        data: event,
    })
    .into_response())
}
