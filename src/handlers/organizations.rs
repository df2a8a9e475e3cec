use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::OrganizationPatch;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    pub email: Option<String>,
    pub org_name: Option<String>,
}

/// GET /api/organizations
pub async fn list_organizations(State(state): State<AppState>) -> Result<Response, AppError> {
    let organizations = state.store.list_organizations().await?;
    Ok(success(organizations, "Organizations retrieved").into_response())
}

/// GET /api/organizations/:org_id
pub async fn get_organization(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let organization = state
        .store
        .get_organization(org_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;
    Ok(success(organization, "Organization retrieved").into_response())
}

/// PATCH /api/organizations/:org_id
///
/// Profile fields only; approval flips through moderation.
pub async fn update_organization(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Json(req): Json<UpdateOrganizationRequest>,
) -> Result<Response, AppError> {
    let patch = OrganizationPatch {
        email: req.email,
        org_name: req.org_name,
    };
    let organization = state
        .store
        .update_organization(org_id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;
    Ok(success(organization, "Organization updated").into_response())
}
