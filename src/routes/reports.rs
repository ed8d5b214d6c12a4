//! Derived report routes: attack simulation and compliance.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::services::attack_sim::{self as attack_sim_service, AttackSimulation};
use crate::services::compliance::{self as compliance_service, ComplianceReport};
use crate::AppState;

/// GET /api/v1/attack-simulation/:scan_id — attack narrative for a stored scan.
pub async fn attack_simulation(
    State(state): State<AppState>,
    Path(scan_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AttackSimulation>>, AppError> {
    let simulation = attack_sim_service::simulate(&state.db, scan_id).await?;
    Ok(ApiResponse::success(simulation))
}

/// GET /api/v1/compliance/:scan_id — compliance mapping for a stored scan.
pub async fn compliance(
    State(state): State<AppState>,
    Path(scan_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ComplianceReport>>, AppError> {
    let report = compliance_service::report(&state.db, scan_id).await?;
    Ok(ApiResponse::success(report))
}
