//! Privileged hospital-approval operation.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use subtle::ConstantTimeEq;

use crate::api::error::ApiError;
use crate::api::router::ServiceContext;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub success: bool,
    pub hospital_id: String,
}

/// `POST /hospitals/:id/approve` — flip a hospital profile to verified.
/// Requires the service's admin bearer token; with no token configured
/// the operation is disabled, not open.
pub async fn approve(
    State(ctx): State<ServiceContext>,
    Path(hospital_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApproveResponse>, ApiError> {
    require_admin(&ctx, &headers)?;

    let approved = ctx.store.approve_hospital(&hospital_id)?;
    tracing::info!(hospital_id = %approved.user_id, "Hospital approved");

    Ok(Json(ApproveResponse {
        success: true,
        hospital_id: approved.user_id,
    }))
}

fn require_admin(ctx: &ServiceContext, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = ctx.config.admin_token.as_deref() else {
        return Err(ApiError::Unauthorized);
    };

    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    if presented.as_bytes().ct_eq(expected.as_bytes()).unwrap_u8() == 0 {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}
