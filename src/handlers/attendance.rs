use crate::attendance::engine::{self, FinalState};
use crate::core::error::{AttendanceError, ValidationError};
use crate::core::state::AppState;
use crate::models::attendance::AttendanceRecord;
use crate::utils::time::now_local;
use crate::validation::params::RegistrarAsistenciaParams;
use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Serialize)]
struct AsistenciaData {
    #[serde(flatten)]
    record: AttendanceRecord,
    estado_final: FinalState,
    marcar_usado: bool,
}

#[derive(Serialize)]
struct RegistrarAsistenciaResponse {
    success: bool,
    data: AsistenciaData,
    mensaje: String,
}

/// Apply a classified class-mode scan to the attendance ledger
///
/// POST /registrar-asistencia
///
/// The kiosk reports `marcar_usado` back through `/marcar-qr-usado`
/// only when the returned outcome is terminal.
pub async fn registrar_asistencia_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<RegistrarAsistenciaParams>,
) -> Result<Response, Response> {
    state.metrics.increment_scans();

    let validated = params.validate().map_err(|e: ValidationError| {
        warn!(error = %e, "Invalid attendance payload");
        state.metrics.increment_rejected();
        e.into_response()
    })?;

    info!(
        user_id = %validated.user_id,
        grupo = %validated.grupo,
        clase_id = %validated.clase_id,
        estado_asistencia = validated.scan.as_str(),
        tiempo_transcurrido = ?validated.tiempo_transcurrido,
        "Registering attendance"
    );

    // Remote kiosks own the elapsed-time classification; the schedule
    // lookup here only flags requests for classes this instance does not
    // know about.
    if state.schedules.get(validated.clase_id).is_none() {
        warn!(
            clase_id = %validated.clase_id,
            "Class missing from configured schedules"
        );
    }

    let outcome = engine::register_scan(
        &state.attendance,
        &state.user_directory,
        &state.wal,
        validated.user_id,
        &validated.grupo,
        validated.clase_id,
        validated.scan,
        now_local(),
    )
    .map_err(|e| {
        match &e {
            AttendanceError::RosterInit(_) | AttendanceError::Store(_) => {
                state.metrics.increment_failed()
            }
            _ => state.metrics.increment_rejected(),
        }
        warn!(error = %e, "Attendance registration failed");
        e.into_response()
    })?;

    state.metrics.increment_accepted();

    Ok(Json(RegistrarAsistenciaResponse {
        success: true,
        data: AsistenciaData {
            record: outcome.record,
            estado_final: outcome.final_state,
            marcar_usado: outcome.mark_used,
        },
        mensaje: "Asistencia registrada correctamente".to_string(),
    })
    .into_response())
}
