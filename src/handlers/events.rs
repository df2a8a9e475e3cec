use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tag::{is_valid_tag, ALL_TAGS};
use crate::models::{Event, EventPatch, NewEvent};
use crate::services::calendar::build_ics;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub event_owner_id: Option<Uuid>,
    pub organization_name: Option<String>,
    pub attendee_count: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_attendees: i32,
    pub cost: Decimal,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    fn from_event(event: Event, organization_name: Option<String>, attendee_count: i64) -> Self {
        Self {
            id: event.id,
            event_owner_id: event.event_owner_id,
            organization_name,
            attendee_count,
            title: event.title,
            description: event.description,
            date: event.date,
            location_name: event.location_name,
            latitude: event.latitude,
            longitude: event.longitude,
            max_attendees: event.max_attendees,
            cost: event.cost,
            tags: event.tags,
            image_url: event.image_url,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_attendees: i32,
    #[serde(default)]
    pub cost: Decimal,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub event_owner_id: Option<Uuid>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_attendees: Option<i32>,
    pub cost: Option<Decimal>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeRequest {
    pub user_id: Option<Uuid>,
}

fn validate_tags(tags: &[String]) -> Result<(), AppError> {
    if let Some(unknown) = tags.iter().find(|t| !is_valid_tag(t)) {
        return Err(AppError::ValidationError(format!(
            "Unknown tag '{unknown}'"
        )));
    }
    Ok(())
}

/// GET /api/tags
pub async fn list_tags() -> Response {
    success(ALL_TAGS, "Tag catalog").into_response()
}

/// GET /api/events
pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state.store.list_events().await?;
    let org_names: HashMap<Uuid, String> = state
        .store
        .list_organizations()
        .await?
        .into_iter()
        .map(|o| (o.id, o.org_name))
        .collect();
    let attendee_counts: HashMap<Uuid, i64> =
        state.store.attendee_counts().await?.into_iter().collect();

    let events: Vec<EventResponse> = events
        .into_iter()
        .map(|event| {
            let name = event
                .event_owner_id
                .and_then(|id| org_names.get(&id).cloned());
            let count = attendee_counts.get(&event.id).copied().unwrap_or(0);
            EventResponse::from_event(event, name, count)
        })
        .collect();
    Ok(success(events, "Events retrieved").into_response())
}

/// GET /api/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = state
        .store
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    let organization_name = match event.event_owner_id {
        Some(owner_id) => state
            .store
            .get_organization(owner_id)
            .await?
            .map(|o| o.org_name),
        None => None,
    };
    let attendee_count = state.store.attendees_for_event(event_id).await?.len() as i64;
    Ok(success(
        EventResponse::from_event(event, organization_name, attendee_count),
        "Event retrieved",
    )
    .into_response())
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::ValidationError("Title is required".to_string()));
    }
    if req.max_attendees < 0 {
        return Err(AppError::ValidationError(
            "maxAttendees must be non-negative".to_string(),
        ));
    }
    validate_tags(&req.tags)?;
    if let Some(owner_id) = req.event_owner_id {
        if state.store.get_organization(owner_id).await?.is_none() {
            return Err(AppError::NotFound("Organization not found".to_string()));
        }
    }

    let event = state
        .store
        .create_event(NewEvent {
            event_owner_id: req.event_owner_id,
            title: req.title,
            description: req.description,
            date: req.date,
            location_name: req.location_name,
            latitude: req.latitude,
            longitude: req.longitude,
            max_attendees: req.max_attendees,
            cost: req.cost,
            tags: req.tags,
            image_url: req.image_url,
        })
        .await?;
    Ok(created(
        EventResponse::from_event(event, None, 0),
        "Event created",
    )
    .into_response())
}

/// PATCH /api/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Response, AppError> {
    if let Some(tags) = &req.tags {
        validate_tags(tags)?;
    }
    if let Some(max_attendees) = req.max_attendees {
        if max_attendees < 0 {
            return Err(AppError::ValidationError(
                "maxAttendees must be non-negative".to_string(),
            ));
        }
    }

    let patch = EventPatch {
        title: req.title,
        description: req.description,
        date: req.date,
        location_name: req.location_name,
        latitude: req.latitude,
        longitude: req.longitude,
        max_attendees: req.max_attendees,
        cost: req.cost,
        tags: req.tags,
        image_url: req.image_url,
    };
    let event = state
        .store
        .update_event(event_id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    let attendee_count = state.store.attendees_for_event(event_id).await?.len() as i64;
    Ok(success(
        EventResponse::from_event(event, None, attendee_count),
        "Event updated",
    )
    .into_response())
}

/// DELETE /api/events/:event_id
///
/// Attendee links and tickets go with the event in one transaction.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !state.store.delete_event(event_id).await? {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    Ok(empty_success("Event deleted").into_response())
}

/// GET /api/events/:event_id/attendees
pub async fn list_attendees(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    if state.store.get_event(event_id).await?.is_none() {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    let attendees = state.store.attendees_for_event(event_id).await?;
    Ok(success(attendees, "Attendees retrieved").into_response())
}

/// POST /api/events/:event_id/register
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    body: Option<Json<AttendeeRequest>>,
) -> Result<Response, AppError> {
    let user_id = body
        .and_then(|Json(req)| req.user_id)
        .ok_or_else(|| AppError::ValidationError("userId is required".to_string()))?;
    if state.store.get_event(event_id).await?.is_none() {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    if state.store.get_user(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    state.store.register_attendee(event_id, user_id).await?;
    Ok(empty_success("Registered to event").into_response())
}

/// POST /api/events/:event_id/deregister
pub async fn deregister(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    body: Option<Json<AttendeeRequest>>,
) -> Result<Response, AppError> {
    let user_id = body
        .and_then(|Json(req)| req.user_id)
        .ok_or_else(|| AppError::ValidationError("userId is required".to_string()))?;
    if state.store.get_event(event_id).await?.is_none() {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    state.store.deregister_attendee(event_id, user_id).await?;
    Ok(empty_success("Deregistered from event").into_response())
}

/// GET /api/events/:event_id/calendar.ics
pub async fn calendar_ics(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = state
        .store
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    let ics = build_ics(&event);
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        ics,
    )
        .into_response())
}
