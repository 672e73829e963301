use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health and readiness probe body
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub message: String,
}
