use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Code block store unavailable", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// List code blocks for the lobby
#[utoipa::path(
    get,
    path = "/api/codeblocks",
    responses(
        (status = 200, description = "All code blocks", body = [CodeBlockSummary]),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn list_code_blocks_doc() {}

/// Get a code block
#[utoipa::path(
    get,
    path = "/api/codeblocks/{id}",
    params(
        ("id" = String, Path, description = "Code block id")
    ),
    responses(
        (status = 200, description = "The code block", body = CodeBlock),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such code block", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn get_code_block_doc() {}

/// Get the starter code of a code block
#[utoipa::path(
    get,
    path = "/api/codeblocks/{id}/initial-content",
    params(
        ("id" = String, Path, description = "Code block id")
    ),
    responses(
        (status = 200, description = "Starter code", body = InitialContentResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such code block", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn get_initial_content_doc() {}

/// Create a code block
#[utoipa::path(
    post,
    path = "/api/codeblocks",
    request_body = CreateCodeBlockRequest,
    responses(
        (status = 201, description = "Code block created", body = CodeBlock),
        (status = 400, description = "Missing required field", body = ErrorResponse),
        (status = 409, description = "Title already taken", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_code_block_doc() {}

/// Room and process diagnostics
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Diagnostics", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        list_code_blocks_doc,
        get_code_block_doc,
        get_initial_content_doc,
        create_code_block_doc,
        diagnostics_doc,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            CodeBlock,
            CodeBlockSummary,
            CreateCodeBlockRequest,
            InitialContentResponse,
            DiagnosticsResponse
        )
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
