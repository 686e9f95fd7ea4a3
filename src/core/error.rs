// Centralized error handling for the kiosk service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::models::wire::ErrorResponse;

fn error_body(status: StatusCode, error: String, detalles: Option<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error,
            detalles,
        }),
    )
        .into_response()
}

/// Request payload rejections. No mutation has happened when one of
/// these is returned.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Tipo de acceso inválido. Debe ser \"entrada\" o \"salida\"")]
    InvalidAccessKind(String),

    #[error("Estado de asistencia no válido")]
    InvalidAttendanceState(String),

    #[error("Falta el parámetro requerido: {0}")]
    MissingParameter(&'static str),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        error_body(StatusCode::BAD_REQUEST, self.to_string(), None)
    }
}

/// Errors from the code ledger endpoints.
#[derive(Error, Debug)]
pub enum CodeError {
    #[error("Código QR no encontrado")]
    NotFound,

    #[error("Error al actualizar QR")]
    Store(#[source] anyhow::Error),
}

impl IntoResponse for CodeError {
    fn into_response(self) -> Response {
        let (status, detalles) = match &self {
            CodeError::NotFound => (StatusCode::NOT_FOUND, None),
            CodeError::Store(e) => {
                tracing::error!(error = %e, "Code ledger store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, Some(e.to_string()))
            }
        };
        error_body(status, self.to_string(), detalles)
    }
}

/// Errors from the access recorder.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("No se pudo obtener información de la zona")]
    UnknownZone(Uuid),

    #[error("Error al registrar el acceso")]
    Store(#[source] anyhow::Error),
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let (status, detalles) = match &self {
            // The original caller treats an unresolvable zone as a bad
            // request, not a missing resource.
            AccessError::UnknownZone(zone_id) => {
                (StatusCode::BAD_REQUEST, Some(format!("zona desconocida: {}", zone_id)))
            }
            AccessError::Store(e) => {
                tracing::error!(error = %e, "Access log store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, Some(e.to_string()))
            }
        };
        error_body(status, self.to_string(), detalles)
    }
}

/// Errors from the attendance state machine.
#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("No se encontró primera pasada. Debe haber escaneado dentro de los primeros 3 minutos.")]
    NoFirstPass,

    #[error("Ya completó la segunda pasada anteriormente.")]
    SecondPassCompleted,

    #[error("Estado inválido para segunda pasada")]
    InvalidSecondPassState,

    #[error("No se encontró registro de asistencia para actualizar")]
    RecordNotFound,

    #[error("Error al crear registros de asistencia")]
    RosterInit(#[source] anyhow::Error),

    #[error("Error al actualizar asistencia")]
    Store(#[source] anyhow::Error),
}

impl IntoResponse for AttendanceError {
    fn into_response(self) -> Response {
        let (status, detalles) = match &self {
            AttendanceError::NoFirstPass
            | AttendanceError::SecondPassCompleted
            | AttendanceError::InvalidSecondPassState => (StatusCode::BAD_REQUEST, None),
            AttendanceError::RecordNotFound => (StatusCode::NOT_FOUND, None),
            AttendanceError::RosterInit(e) | AttendanceError::Store(e) => {
                tracing::error!(error = %e, "Attendance store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, Some(e.to_string()))
            }
        };
        error_body(status, self.to_string(), detalles)
    }
}

/// Errors from the identity/QR lookup endpoints.
///
/// Absence of a code or user is a normal `existe: false` body, not an
/// error; only directory inconsistencies land here.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Error al consultar el directorio")]
    OwnerMissing(Uuid),
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let LookupError::OwnerMissing(user_id) = &self;
        tracing::error!(user_id = %user_id, "QR owner missing from user directory");
        let detalles = format!("usuario propietario no encontrado: {}", user_id);
        error_body(StatusCode::INTERNAL_SERVER_ERROR, self.to_string(), Some(detalles))
    }
}

/// Errors from the directory re-sync endpoint.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("No se pudo sincronizar el directorio")]
    Backend(#[source] anyhow::Error),
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let (status, detalles) = match &self {
            SyncError::InvalidApiKey => (StatusCode::UNAUTHORIZED, None),
            SyncError::Backend(e) => {
                tracing::error!(error = %e, "Directory sync failure");
                (StatusCode::INTERNAL_SERVER_ERROR, Some(e.to_string()))
            }
        };
        error_body(status, self.to_string(), detalles)
    }
}

#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error("Invalid API key")]
    InvalidApiKey,
}

impl IntoResponse for MonitoringError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}
