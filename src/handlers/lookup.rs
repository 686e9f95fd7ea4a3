use crate::core::error::LookupError;
use crate::core::state::AppState;
use crate::models::user::UsuarioView;
use crate::models::wire::{QrLookupResponse, UsuarioLookupResponse, UsuariosResponse};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// QR lookup and single-use validation
///
/// GET /buscar-qr/{codigo}
///
/// A known-and-unused code resolves to its owner; a spent code answers
/// `existe: false, usado: true` and can never resolve again.
pub async fn buscar_qr_handler(
    State(state): State<Arc<AppState>>,
    Path(codigo): Path<String>,
) -> Result<Response, LookupError> {
    debug!(codigo = %codigo, "Looking up QR code");

    let Some(code) = state.code_ledger.lookup(&codigo) else {
        info!(codigo = %codigo, "QR code not found");
        return Ok(Json(QrLookupResponse::unknown()).into_response());
    };

    if code.used {
        info!(codigo = %codigo, "QR code already used");
        return Ok(Json(QrLookupResponse::already_used()).into_response());
    }

    let user = state
        .user_directory
        .get(code.user_id)
        .ok_or(LookupError::OwnerMissing(code.user_id))?;

    debug!(codigo = %codigo, usuario = %user.nombre, "QR valid and available");

    let usuario = UsuarioView::resolve(&user, state.config.storage.public_base_url.as_deref());
    Ok(Json(QrLookupResponse::found(code, usuario)).into_response())
}

/// GET /buscar-usuario/{id}
pub async fn buscar_usuario_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.user_directory.get(id) {
        Some(user) => {
            let usuario =
                UsuarioView::resolve(&user, state.config.storage.public_base_url.as_deref());
            Json(UsuarioLookupResponse {
                existe: true,
                usuario: Some(usuario),
            })
            .into_response()
        }
        None => Json(UsuarioLookupResponse {
            existe: false,
            usuario: None,
        })
        .into_response(),
    }
}

/// GET /buscar-usuario-matricula/{matricula}
pub async fn buscar_usuario_matricula_handler(
    State(state): State<Arc<AppState>>,
    Path(matricula): Path<String>,
) -> Response {
    match state.user_directory.get_by_matricula(&matricula) {
        Some(user) => {
            let usuario =
                UsuarioView::resolve(&user, state.config.storage.public_base_url.as_deref());
            Json(UsuarioLookupResponse {
                existe: true,
                usuario: Some(usuario),
            })
            .into_response()
        }
        None => Json(UsuarioLookupResponse {
            existe: false,
            usuario: None,
        })
        .into_response(),
    }
}

/// GET /users
pub async fn users_handler(State(state): State<Arc<AppState>>) -> Response {
    let base = state.config.storage.public_base_url.as_deref();
    let usuarios = state
        .user_directory
        .all()
        .iter()
        .map(|user| UsuarioView::resolve(user, base))
        .collect();

    Json(UsuariosResponse {
        mensaje: "Consulta exitosa".to_string(),
        usuarios,
    })
    .into_response()
}
