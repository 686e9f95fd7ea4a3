use axum::{
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};

use crate::models::wire::ErrorResponse;

pub async fn fallback_handler(headers: HeaderMap) -> Response {
    // Browsers poking around get a plain page; kiosk clients get JSON.
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let is_browser = user_agent.contains("Mozilla")
        || user_agent.contains("Chrome")
        || user_agent.contains("Safari")
        || user_agent.contains("Firefox")
        || user_agent.contains("Edge");

    if is_browser {
        return Html("Nada que ver aquí.").into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: "Ruta no encontrada".to_string(),
            detalles: Some(
                "Rutas válidas: /buscar-qr, /marcar-qr-usado, /registrar-acceso, \
                 /registrar-asistencia, /buscar-usuario, /users, /health"
                    .to_string(),
            ),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_json_for_non_browser() {
        let response = fallback_handler(HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fallback_html_for_browser() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", "Mozilla/5.0".parse().unwrap());
        let response = fallback_handler(headers).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
