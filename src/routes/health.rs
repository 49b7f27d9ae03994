use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub store_ok: bool,
    pub store_error: Option<String>,
    pub active_sessions: usize,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Health check", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    // Readability of the users collection stands in for the whole store.
    let store_check = state.store.check().await;
    let active_sessions = state.sessions.store().len().await;

    match store_check {
        Ok(()) => Ok(Json(HealthResponse {
            status: "ok",
            store_ok: true,
            store_error: None,
            active_sessions,
        })),
        Err(e) => Ok(Json(HealthResponse {
            status: "degraded",
            store_ok: false,
            store_error: Some(e.to_string()),
            active_sessions,
        })),
    }
}
