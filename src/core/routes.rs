// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Scan flow endpoints
        .route("/buscar-qr/{codigo}", get(crate::handlers::lookup::buscar_qr_handler))
        .route("/marcar-qr-usado", post(crate::handlers::code::marcar_qr_usado_handler))
        .route("/registrar-acceso", post(crate::handlers::access::registrar_acceso_handler))
        .route(
            "/registrar-asistencia",
            post(crate::handlers::attendance::registrar_asistencia_handler),
        )

        // Identity lookups
        .route("/buscar-usuario/{id}", get(crate::handlers::lookup::buscar_usuario_handler))
        .route(
            "/buscar-usuario-matricula/{matricula}",
            get(crate::handlers::lookup::buscar_usuario_matricula_handler),
        )
        .route("/users", get(crate::handlers::lookup::users_handler))

        // Operational endpoints
        .route("/health", get(crate::handlers::health::health_handler))
        .route("/metrics", get(crate::handlers::metrics::metrics_handler))
        .route("/reload", post(crate::handlers::admin::reload_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}
