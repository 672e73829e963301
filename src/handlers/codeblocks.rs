use axum::{extract::{Path, State}, http::StatusCode, Json};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::{CodeBlock, CodeBlockSummary, CreateCodeBlockRequest, ErrorResponse, InitialContentResponse};
use crate::state::AppState;

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// List all code blocks for the lobby
pub async fn list_code_blocks(
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<CodeBlockSummary>>), HandlerError> {
    let blocks = app_state.code_blocks.list().await.map_err(|e| {
        error!("Failed to list code blocks: {}", e);
        ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching code blocks")
    })?;
    Ok((StatusCode::OK, Json(blocks)))
}

/// Get a single code block
pub async fn get_code_block(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<CodeBlock>), HandlerError> {
    let block_id = parse_block_id(&id)?;
    match app_state.code_blocks.get(block_id).await {
        Ok(Some(block)) => Ok((StatusCode::OK, Json(block))),
        Ok(None) => Err(ErrorResponse::reply(StatusCode::NOT_FOUND, format!("Code block '{}' not found", id))),
        Err(e) => {
            error!("Failed to load code block '{}': {}", id, e);
            Err(ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching code block"))
        }
    }
}

/// Starter code of a code block
pub async fn get_initial_content(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<InitialContentResponse>), HandlerError> {
    let block_id = parse_block_id(&id)?;
    match app_state.code_blocks.initial_content(block_id).await {
        Ok(Some(content)) => Ok((StatusCode::OK, Json(InitialContentResponse { id: block_id, content }))),
        Ok(None) => Err(ErrorResponse::reply(StatusCode::NOT_FOUND, format!("Code block '{}' not found", id))),
        Err(e) => {
            error!("Failed to load initial content of '{}': {}", id, e);
            Err(ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching code block"))
        }
    }
}

/// Create a new code block
pub async fn create_code_block(
    State(app_state): State<AppState>,
    Json(request): Json<CreateCodeBlockRequest>,
) -> Result<(StatusCode, Json<CodeBlock>), HandlerError> {
    if let Err(message) = request.validate() {
        warn!("Rejected code block: {}", message);
        return Err(ErrorResponse::reply(StatusCode::BAD_REQUEST, message));
    }

    match app_state.code_blocks.create(request).await {
        Ok(block) => {
            info!("Created code block {}", block.id);
            Ok((StatusCode::CREATED, Json(block)))
        }
        Err(e @ StoreError::DuplicateTitle(_)) => Err(ErrorResponse::reply(StatusCode::CONFLICT, e.to_string())),
        Err(e) => {
            error!("Failed to create code block: {}", e);
            Err(ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, "Error creating code block"))
        }
    }
}

fn parse_block_id(id: &str) -> Result<Uuid, HandlerError> {
    Uuid::parse_str(id).map_err(|e| {
        error!("Invalid code block id '{}': {}", id, e);
        ErrorResponse::reply(StatusCode::BAD_REQUEST, format!("Invalid code block id '{}'", id))
    })
}
