//! Scan routes: submission and retrieval.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::models::scan::{ScanRequest, ScanResult};
use crate::services::scan as scan_service;
use crate::AppState;

/// POST /api/v1/scan/analyze — scan submitted code and persist the result.
pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> Result<Json<ApiResponse<ScanResult>>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let result = scan_service::analyze(&state.db, state.chat.clone(), &body).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/scan/:scan_id — fetch a stored scan result.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(scan_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ScanResult>>, AppError> {
    let result = scan_service::get(&state.db, scan_id).await?;
    Ok(ApiResponse::success(result))
}
