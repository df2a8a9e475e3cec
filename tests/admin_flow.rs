mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use campus_connect_server::store::{MemoryStore, Store};

use common::{
    app, app_with_identity, as_uuid, seed_event, seed_org, seed_user, send, RejectingIdentity,
};

#[tokio::test]
async fn event_crud_roundtrip() {
    let store = Arc::new(MemoryStore::new());
    let app = app(store);

    let (status, body) = send(
        &app,
        "POST",
        "/api/events",
        Some(json!({
            "title": "Open mic",
            "date": "2026-11-20T19:00:00Z",
            "locationName": "Coffee house",
            "maxAttendees": 40,
            "tags": ["OPEN_MIC", "FREE_ENTRY"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = as_uuid(&body["data"]["id"]);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/events/{event_id}"),
        Some(json!({ "maxAttendees": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["maxAttendees"], 60);

    let (status, body) = send(&app, "GET", &format!("/api/events/{event_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Open mic");

    let (status, _) = send(&app, "DELETE", &format!("/api/events/{event_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/events/{event_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn creating_an_event_with_unknown_tags_fails() {
    let app = app(Arc::new(MemoryStore::new()));
    let (status, body) = send(
        &app,
        "POST",
        "/api/events",
        Some(json!({
            "title": "Mystery",
            "date": "2026-11-20T19:00:00Z",
            "locationName": "Nowhere",
            "maxAttendees": 10,
            "tags": ["NOT_A_TAG"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn deleting_an_event_cascades_to_tickets_and_attendees() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 5).await;
    let user = seed_user(&store, 1).await;
    let app = app(store.clone());

    send(
        &app,
        "POST",
        &format!("/api/events/{}/register", event.id),
        Some(json!({ "userId": user.id })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/events/{}/tickets", event.id),
        Some(json!({ "userId": user.id })),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/api/events/{}", event.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.tickets_for_event(event.id).await.unwrap().is_empty());
    assert!(store
        .attendees_for_event(event.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn registration_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 5).await;
    let user = seed_user(&store, 1).await;
    let app = app(store.clone());

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/events/{}/register", event.id),
            Some(json!({ "userId": user.id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/events/{}/attendees", event.id),
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", &format!("/api/events/{}", event.id), None).await;
    assert_eq!(body["data"]["attendeeCount"], 1);
}

#[tokio::test]
async fn event_analytics_shape_matches_scenario() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 10).await;
    let app = app(store.clone());

    // 5 issued, 2 checked in.
    let mut tokens = Vec::new();
    for n in 1..=5 {
        let user = seed_user(&store, n).await;
        let (_, body) = send(
            &app,
            "POST",
            &format!("/api/events/{}/tickets", event.id),
            Some(json!({ "userId": user.id })),
        )
        .await;
        let ticket_id = as_uuid(&body["ticket"]["id"]);
        let (_, body) = send(&app, "POST", &format!("/api/tickets/{ticket_id}/qr"), None).await;
        tokens.push(body["payload"]["t"].as_str().unwrap().to_string());
    }
    for token in tokens.iter().take(2) {
        send(&app, "POST", "/api/checkin", Some(json!({ "token": token }))).await;
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/events/{}/analytics", event.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticketsIssued"], 5);
    assert_eq!(body["attended"], 2);
    assert_eq!(body["notAttended"], 3);
    assert_eq!(body["remainingCapacity"], 5);
    assert_eq!(body["attendanceRate"], 40.0);
    assert_eq!(body["capacityUtilization"], 50.0);
    assert_eq!(body["capacity"], 10);
}

#[tokio::test]
async fn admin_analytics_reports_totals_and_trend() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 10).await;
    let user = seed_user(&store, 1).await;
    let app = app(store);

    send(
        &app,
        "POST",
        &format!("/api/events/{}/tickets", event.id),
        Some(json!({ "userId": user.id })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/admin/analytics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["numEvents"], 1);
    assert_eq!(body["data"]["numTickets"], 1);
    assert_eq!(body["data"]["totalAttendance"], 0);
    let trend = body["data"]["attendanceTrend"].as_array().unwrap();
    assert_eq!(trend.len(), 1);
    // 2026-10-12 is a Monday.
    assert_eq!(trend[0]["weekStart"], "2026-10-12");
    assert_eq!(trend[0]["ticketsIssued"], 1);
}

#[tokio::test]
async fn calendar_export_is_an_ics_document() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 5).await;
    let app = app(store);

    let request = axum::http::Request::builder()
        .method("GET")
        .uri(format!("/api/events/{}/calendar.ics", event.id))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/calendar"));
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let ics = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(ics.contains("BEGIN:VEVENT"));
    assert!(ics.contains("SUMMARY:Club fair"));
}

#[tokio::test]
async fn user_profile_can_be_patched() {
    let store = Arc::new(MemoryStore::new());
    let user = seed_user(&store, 1).await;
    let app = app(store);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}", user.id),
        Some(json!({ "firstName": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["firstName"], "Ada");
    // Untouched fields survive a partial update.
    assert_eq!(body["data"]["lastName"], "Test");
    assert_eq!(body["data"]["email"], "student1@campus.test");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}", uuid::Uuid::new_v4()),
        Some(json!({ "firstName": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn organization_can_be_fetched_and_patched() {
    let store = Arc::new(MemoryStore::new());
    let org = seed_org(&store).await;
    let app = app(store);

    let (status, body) = send(&app, "GET", &format!("/api/organizations/{}", org.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orgName"], "Robotics Club");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/organizations/{}", org.id),
        Some(json!({ "orgName": "Robotics Society" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orgName"], "Robotics Society");
    // Approval is out of reach of the profile patch.
    assert_eq!(body["data"]["isApproved"], false);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/organizations/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn moderation_can_promote_and_approve() {
    let store = Arc::new(MemoryStore::new());
    let user = seed_user(&store, 1).await;
    let app = app(store.clone());

    let (status, _) = send(
        &app,
        "POST",
        "/api/moderate",
        Some(json!({ "reqType": "ChangeAdminStatus", "userId": user.id, "role": "ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/api/users/{}", user.id), None).await;
    assert_eq!(body["data"]["role"], "ADMIN");
}

#[tokio::test]
async fn user_deletion_revokes_identity() {
    let store = Arc::new(MemoryStore::new());
    let user = seed_user(&store, 1).await;
    let app = app(store.clone());

    let (status, _) = send(
        &app,
        "POST",
        "/api/moderate",
        Some(json!({ "reqType": "DeleteUser", "authId": user.auth_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.get_user(user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_identity_revocation_is_not_masked() {
    let store = Arc::new(MemoryStore::new());
    let user = seed_user(&store, 1).await;
    let app = app_with_identity(store, Arc::new(RejectingIdentity));

    let (status, body) = send(
        &app,
        "POST",
        "/api/moderate",
        Some(json!({ "reqType": "DeleteUser", "authId": user.auth_id })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "EXTERNAL_SERVICE_ERROR");
}
