use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::success;

pub mod analytics;
pub mod checkin;
pub mod events;
pub mod moderation;
pub mod organizations;
pub mod tickets;
pub mod users;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "campus-connect-api",
    };

    success(payload, "Health check successful").into_response()
}
