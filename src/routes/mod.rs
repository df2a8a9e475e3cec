use axum::{
    routing::{get, post},
    Router,
};

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{
    analytics, checkin, events, health_check, moderation, organizations, tickets, users,
};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/tags", get(events::list_tags))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/events/:event_id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/api/events/:event_id/attendees", get(events::list_attendees))
        .route("/api/events/:event_id/register", post(events::register))
        .route("/api/events/:event_id/deregister", post(events::deregister))
        .route("/api/events/:event_id/tickets", post(tickets::issue_ticket))
        .route("/api/events/:event_id/calendar.ics", get(events::calendar_ics))
        .route(
            "/api/events/:event_id/analytics",
            get(analytics::event_analytics),
        )
        .route("/api/admin/analytics", get(analytics::admin_analytics))
        .route("/api/tickets/:ticket_id/qr", post(checkin::mint_token))
        .route("/api/checkin", post(checkin::redeem_token))
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/:user_id",
            get(users::get_user).patch(users::update_user),
        )
        .route("/api/users/:user_id/events", get(users::registered_events))
        .route("/api/organizations", get(organizations::list_organizations))
        .route(
            "/api/organizations/:org_id",
            get(organizations::get_organization).patch(organizations::update_organization),
        )
        .route("/api/moderate", post(moderation::moderate))
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
