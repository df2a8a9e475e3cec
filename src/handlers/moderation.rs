use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::UserRole;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::empty_success;

/// Moderation requests carry an explicit type tag; unknown shapes are
/// rejected at deserialization time.
#[derive(Deserialize)]
#[serde(tag = "reqType", rename_all_fields = "camelCase")]
pub enum ModerationRequest {
    ChangeAdminStatus { user_id: Uuid, role: UserRole },
    ApproveOrganization { org_id: Uuid },
    DeleteUser { auth_id: String },
    DeleteOrganization { auth_id: String },
}

/// POST /api/moderate
pub async fn moderate(
    State(state): State<AppState>,
    Json(req): Json<ModerationRequest>,
) -> Result<Response, AppError> {
    match req {
        ModerationRequest::ChangeAdminStatus { user_id, role } => {
            if !state.store.set_user_role(user_id, role).await? {
                return Err(AppError::NotFound("User not found".to_string()));
            }
            Ok(empty_success("Role updated").into_response())
        }
        ModerationRequest::ApproveOrganization { org_id } => {
            if !state.store.set_organization_approved(org_id, true).await? {
                return Err(AppError::NotFound("Organization not found".to_string()));
            }
            Ok(empty_success("Organization approved").into_response())
        }
        ModerationRequest::DeleteUser { auth_id } => {
            let deleted = state
                .store
                .delete_user(&auth_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Not a user - can't delete".to_string()))?;
            // Partial success is never masked: a failed revoke reports the
            // whole deletion as failed even though the local row is gone.
            state
                .identity
                .revoke_identity(&auth_id)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, user = %deleted.email, "Identity revocation failed");
                    AppError::ExternalServiceError("Failed to revoke auth identity".to_string())
                })?;
            Ok(empty_success("User deleted").into_response())
        }
        ModerationRequest::DeleteOrganization { auth_id } => {
            let deleted = state
                .store
                .delete_organization(&auth_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound("Not an organization - can't delete".to_string())
                })?;
            state
                .identity
                .revoke_identity(&auth_id)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, org = %deleted.email, "Identity revocation failed");
                    AppError::ExternalServiceError("Failed to revoke auth identity".to_string())
                })?;
            Ok(empty_success("Organization deleted").into_response())
        }
    }
}
