use crate::api::client::DirectoryClient;
use crate::core::error::SyncError;
use crate::core::startup::populate_from_api;
use crate::core::state::AppState;
use crate::models::wire::{ApiKeyQuery, SuccessResponse};
use crate::utils::auth::verify_api_key;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Re-sync users, zones and issued codes from the directory backend
///
/// POST /reload?api_key=<key>
///
/// Usage flags already held by the ledger survive the refresh.
pub async fn reload_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
) -> Result<Response, SyncError> {
    if !verify_api_key(&params.api_key, &state.config.sync.api_key) {
        warn!("Unauthorized reload attempt");
        return Err(SyncError::InvalidApiKey);
    }

    let client = DirectoryClient::new(
        state.config.sync.data_endpoint.clone(),
        state.config.sync.api_key.clone(),
    )
    .map_err(SyncError::Backend)?;

    populate_from_api(&state, &client)
        .await
        .map_err(SyncError::Backend)?;

    info!(
        users = state.user_directory.len(),
        zones = state.zone_registry.len(),
        codes = state.code_ledger.len(),
        "Directory re-synced"
    );

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: "Directorio sincronizado".to_string(),
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::create_test_state;

    #[tokio::test]
    async fn test_reload_rejects_bad_api_key() {
        let (_dir, state) = create_test_state();

        let result = reload_handler(
            State(state),
            Query(ApiKeyQuery {
                api_key: "wrong-key".to_string(),
            }),
        )
        .await;

        assert!(result.is_err());
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
