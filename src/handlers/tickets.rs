use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Ticket, TicketStatus};
use crate::services::tickets::IssueError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTicketRequest {
    pub user_id: Option<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketBody {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: TicketStatus,
    pub qr_token: Option<String>,
}

impl From<Ticket> for TicketBody {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            event_id: ticket.event_id,
            user_id: ticket.user_id,
            status: ticket.status,
            qr_token: ticket.qr_token,
        }
    }
}

#[derive(Serialize)]
pub struct IssueSuccess {
    pub success: bool,
    pub ticket: TicketBody,
}

#[derive(Serialize)]
pub struct IssueFailure {
    pub success: bool,
    pub error: String,
}

fn issue_status(error: &IssueError) -> StatusCode {
    match error {
        IssueError::MissingInput => StatusCode::BAD_REQUEST,
        IssueError::EventNotFound | IssueError::UserNotFound => StatusCode::NOT_FOUND,
        IssueError::SoldOut => StatusCode::CONFLICT,
        IssueError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /api/events/:event_id/tickets
pub async fn issue_ticket(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    body: Option<Json<IssueTicketRequest>>,
) -> Response {
    let user_id = body.and_then(|Json(req)| req.user_id);

    match state.tickets.issue_ticket(Some(event_id), user_id).await {
        Ok(ticket) => (
            StatusCode::CREATED,
            Json(IssueSuccess {
                success: true,
                ticket: ticket.into(),
            }),
        )
            .into_response(),
        Err(error) => {
            if let IssueError::Storage(e) = &error {
                tracing::error!(error = ?e, "Ticket issuance failed");
            }
            (
                issue_status(&error),
                Json(IssueFailure {
                    success: false,
                    error: error.to_string(),
                }),
            )
                .into_response()
        }
    }
}
