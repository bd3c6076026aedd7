//! Health and smoke-test endpoints

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub message: String,
    pub redirect_uri: String,
    pub app_redirect_uri: String,
}

/// `GET /test` — deployment smoke check
pub async fn test_banner(State(state): State<AppState>) -> Json<TestResponse> {
    Json(TestResponse {
        message: "Octolink relay is running".to_string(),
        redirect_uri: state.config.backend_redirect_uri.clone(),
        app_redirect_uri: state.config.app_redirect_uri.clone(),
    })
}
