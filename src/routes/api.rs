use crate::handlers::{
    create_code_block, diagnostics, get_code_block, get_initial_content, health_check,
    list_code_blocks, ready_check,
};
use crate::state::AppState;
use axum::{routing::get, Router};

/// Create API routes
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/codeblocks", get(list_code_blocks).post(create_code_block))
        .route("/codeblocks/:id", get(get_code_block))
        .route("/codeblocks/:id/initial-content", get(get_initial_content))
        .route("/v1/diagnostics", get(diagnostics))
}
