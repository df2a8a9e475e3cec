#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use campus_connect_server::auth::{IdentityError, IdentityProvider};
use campus_connect_server::models::{
    Event, NewEvent, NewOrganization, NewUser, Organization, User, UserRole,
};
use campus_connect_server::routes::create_routes;
use campus_connect_server::state::AppState;
use campus_connect_server::store::{MemoryStore, Store};

pub struct AcceptAllIdentity;

#[async_trait]
impl IdentityProvider for AcceptAllIdentity {
    async fn revoke_identity(&self, _auth_id: &str) -> Result<(), IdentityError> {
        Ok(())
    }
}

/// Identity double whose revocations always fail, for exercising the
/// no-partial-success contract of account deletion.
pub struct RejectingIdentity;

#[async_trait]
impl IdentityProvider for RejectingIdentity {
    async fn revoke_identity(&self, _auth_id: &str) -> Result<(), IdentityError> {
        Err(IdentityError::Rejected(503))
    }
}

pub fn app(store: Arc<MemoryStore>) -> Router {
    create_routes(AppState::new(store, Arc::new(AcceptAllIdentity)))
}

pub fn app_with_identity(
    store: Arc<MemoryStore>,
    identity: Arc<dyn IdentityProvider>,
) -> Router {
    create_routes(AppState::new(store, identity))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub fn default_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 12, 18, 0, 0).unwrap()
}

pub async fn seed_event(store: &Arc<MemoryStore>, capacity: i32) -> Event {
    store
        .create_event(NewEvent {
            event_owner_id: None,
            title: "Club fair".to_string(),
            description: Some("All clubs on the quad".to_string()),
            date: default_date(),
            location_name: "Quad".to_string(),
            latitude: None,
            longitude: None,
            max_attendees: capacity,
            cost: Decimal::ZERO,
            tags: vec!["CLUB_FAIR".to_string()],
            image_url: None,
        })
        .await
        .unwrap()
}

pub async fn seed_user(store: &Arc<MemoryStore>, n: u32) -> User {
    store
        .create_user(NewUser {
            auth_id: format!("auth-{n}"),
            email: format!("student{n}@campus.test"),
            first_name: format!("Student{n}"),
            last_name: "Test".to_string(),
            role: UserRole::User,
        })
        .await
        .unwrap()
}

pub async fn seed_org(store: &Arc<MemoryStore>) -> Organization {
    store
        .create_organization(NewOrganization {
            auth_id: "auth-org".to_string(),
            email: "club@campus.test".to_string(),
            org_name: "Robotics Club".to_string(),
            is_approved: false,
        })
        .await
        .unwrap()
}

pub fn as_uuid(value: &Value) -> Uuid {
    Uuid::parse_str(value.as_str().expect("expected a string id")).expect("expected a uuid")
}
