use axum::{extract::State, http::StatusCode, Json};
use crate::models::HealthResponse;
use crate::state::AppState;
use tracing::{debug, error};

const SERVICE: &str = env!("CARGO_PKG_NAME");

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE.to_string(),
        message: "Server is running".to_string(),
    })
}

/// Readiness check endpoint, fails while the template store is unreachable
pub async fn ready_check(State(app_state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    debug!("Readiness check requested");
    match app_state.code_blocks.list().await {
        Ok(_) => (StatusCode::OK, Json(HealthResponse {
            status: "ok".to_string(),
            service: SERVICE.to_string(),
            message: "Service is ready".to_string(),
        })),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse {
                status: "unavailable".to_string(),
                service: SERVICE.to_string(),
                message: format!("Code block store unavailable: {}", e),
            }))
        }
    }
}
