//! Shared JSON response bodies.

use axum::Json;
use serde::Serialize;

/// `{"success": true}`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub fn ok_success() -> Json<SuccessResponse> {
    Json(SuccessResponse { success: true })
}
