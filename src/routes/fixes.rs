//! Secure-fix route.

use axum::{extract::Path, Json};

use crate::errors::ApiResponse;
use crate::services::fixes::{self as fixes_service, SecureFix};

/// GET /api/v1/secure-fix/:vulnerability_id — before/after fix template for
/// an issue. Infallible: unknown ids get the default template.
pub async fn get_fix(Path(vulnerability_id): Path<String>) -> Json<ApiResponse<SecureFix>> {
    ApiResponse::success(fixes_service::lookup(&vulnerability_id))
}
