use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::qr::QrError;
use crate::state::AppState;

/// Token payload embedded in the QR image. Structured so scanners decode
/// it unambiguously.
#[derive(Serialize)]
pub struct QrPayload {
    pub t: String,
}

#[derive(Serialize)]
pub struct MintSuccess {
    pub ok: bool,
    pub payload: QrPayload,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemSuccess {
    pub ok: bool,
    pub ticket_id: Uuid,
}

#[derive(Serialize)]
pub struct QrFailure {
    pub ok: bool,
    pub reason: String,
}

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub token: Option<String>,
}

fn qr_failure(error: QrError) -> Response {
    let status = match &error {
        QrError::MissingToken => StatusCode::BAD_REQUEST,
        QrError::TicketNotFound | QrError::InvalidCode => StatusCode::NOT_FOUND,
        QrError::AlreadyCheckedIn => StatusCode::CONFLICT,
        QrError::Storage(e) => {
            tracing::error!(error = ?e, "QR operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(QrFailure {
            ok: false,
            reason: error.to_string(),
        }),
    )
        .into_response()
}

/// POST /api/tickets/:ticket_id/qr
pub async fn mint_token(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Response {
    let Ok(ticket_id) = Uuid::parse_str(&ticket_id) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(QrFailure {
                ok: false,
                reason: "Invalid ticket id".to_string(),
            }),
        )
            .into_response();
    };

    match state.qr.mint_token(ticket_id).await {
        Ok(token) => Json(MintSuccess {
            ok: true,
            payload: QrPayload { t: token },
        })
        .into_response(),
        Err(error) => qr_failure(error),
    }
}

/// POST /api/checkin
pub async fn redeem_token(
    State(state): State<AppState>,
    body: Option<Json<RedeemRequest>>,
) -> Response {
    let token = body
        .and_then(|Json(req)| req.token)
        .unwrap_or_default();

    match state.qr.redeem_token(&token).await {
        Ok(ticket_id) => Json(RedeemSuccess {
            ok: true,
            ticket_id,
        })
        .into_response(),
        Err(error) => qr_failure(error),
    }
}
