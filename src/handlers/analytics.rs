use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::services::analytics::AnalyticsError;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

impl From<AnalyticsError> for AppError {
    fn from(error: AnalyticsError) -> Self {
        match error {
            AnalyticsError::EventNotFound => AppError::NotFound("Event not found".to_string()),
            AnalyticsError::Storage(e) => AppError::StorageError(e),
        }
    }
}

/// GET /api/events/:event_id/analytics
pub async fn event_analytics(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let analytics = state.analytics.event_analytics(event_id).await?;
    Ok(Json(analytics).into_response())
}

/// GET /api/admin/analytics
pub async fn admin_analytics(State(state): State<AppState>) -> Result<Response, AppError> {
    let analytics = state.analytics.admin_analytics().await?;
    Ok(success(analytics, "Analytics computed").into_response())
}
