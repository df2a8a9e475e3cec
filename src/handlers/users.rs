use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::UserPatch;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Response, AppError> {
    let users = state.store.list_users().await?;
    Ok(success(users, "Users retrieved").into_response())
}

/// GET /api/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(success(user, "User retrieved").into_response())
}

/// PATCH /api/users/:user_id
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Response, AppError> {
    let patch = UserPatch {
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
    };
    let user = state
        .store
        .update_user(user_id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(success(user, "User updated").into_response())
}

/// GET /api/users/:user_id/events
pub async fn registered_events(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if state.store.get_user(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    let events = state.store.events_for_user(user_id).await?;
    Ok(success(events, "Registered events retrieved").into_response())
}
