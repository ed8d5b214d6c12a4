//! Health check endpoints for liveness and readiness probes, plus the
//! service banner served at the root.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::AppState;

/// Root banner payload.
#[derive(Debug, Serialize)]
pub struct ServiceBanner {
    pub name: &'static str,
    pub version: &'static str,
}

/// Readiness probe detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

/// GET / — identify the service.
pub async fn banner() -> Json<ApiResponse<ServiceBanner>> {
    ApiResponse::success(ServiceBanner {
        name: "SecureReview AI+++ API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe — always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe — checks database connectivity.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            format!("error: {e}")
        }
    };

    ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        database: db_status,
    })
}
