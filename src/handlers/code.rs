use crate::core::error::CodeError;
use crate::core::state::AppState;
use crate::models::code::Code;
use crate::utils::time::now_local;
use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct MarcarUsadoParams {
    pub codigo: String,
}

#[derive(Serialize)]
struct MarcarUsadoResponse {
    success: bool,
    data: Code,
}

/// Mark a QR code as used after a terminal access/attendance outcome
///
/// POST /marcar-qr-usado
pub async fn marcar_qr_usado_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<MarcarUsadoParams>,
) -> Result<Response, CodeError> {
    let data = state
        .code_ledger
        .consume(&state.wal, &params.codigo, now_local())?;

    info!(codigo = %params.codigo, "QR code marked as used");

    Ok(Json(MarcarUsadoResponse {
        success: true,
        data,
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::create_test_state;
    use axum::body::Body;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_marcar_usado_success() {
        let (_dir, state) = create_test_state();
        state.code_ledger.add_code(Code::new("QR-1", Uuid::new_v4()));

        let response = marcar_qr_usado_handler(
            State(state.clone()),
            Json(MarcarUsadoParams {
                codigo: "QR-1".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (_, body) = response.into_parts();
        let bytes = Body::new(body).collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["usado"], true);

        // The lookup sees the flip immediately.
        assert!(state.code_ledger.lookup("QR-1").unwrap().used);
    }

    #[tokio::test]
    async fn test_marcar_usado_unknown_is_404() {
        let (_dir, state) = create_test_state();

        let err = marcar_qr_usado_handler(
            State(state),
            Json(MarcarUsadoParams {
                codigo: "QR-missing".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
