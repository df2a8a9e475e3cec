mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use campus_connect_server::store::{MemoryStore, Store};

use common::{app, as_uuid, seed_event, seed_user, send};

#[tokio::test]
async fn health_endpoint_responds() {
    let app = app(Arc::new(MemoryStore::new()));
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["service"], "campus-connect-api");
}

#[tokio::test]
async fn issue_ticket_returns_created_ticket_shape() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 3).await;
    let user = seed_user(&store, 1).await;
    let app = app(store);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/events/{}/tickets", event.id),
        Some(json!({ "userId": user.id })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(as_uuid(&body["ticket"]["eventId"]), event.id);
    assert_eq!(as_uuid(&body["ticket"]["userId"]), user.id);
    assert_eq!(body["ticket"]["status"], "ISSUED");
    assert!(body["ticket"]["qrToken"].is_null());
}

#[tokio::test]
async fn issue_ticket_without_user_is_a_validation_failure() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 3).await;
    let app = app(store);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/events/{}/tickets", event.id),
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Invalid input: eventId and userId are required"
    );
}

#[tokio::test]
async fn sold_out_event_rejects_further_issuance() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 3).await;
    let app = app(store.clone());

    for n in 1..=3 {
        let user = seed_user(&store, n).await;
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/events/{}/tickets", event.id),
            Some(json!({ "userId": user.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let fourth = seed_user(&store, 4).await;
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/events/{}/tickets", event.id),
        Some(json!({ "userId": fourth.id })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Sold out or not enough capacity");
    assert_eq!(store.count_tickets_for_event(event.id).await.unwrap(), 3);
}

#[tokio::test]
async fn unknown_user_cannot_be_issued_a_ticket() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 3).await;
    let app = app(store);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/events/{}/tickets", event.id),
        Some(json!({ "userId": uuid::Uuid::new_v4() })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "Authenticated user not found; cannot create tickets"
    );
}

#[tokio::test]
async fn mint_then_redeem_then_redeem_again() {
    let store = Arc::new(MemoryStore::new());
    let event = seed_event(&store, 3).await;
    let user = seed_user(&store, 1).await;
    let app = app(store);

    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/events/{}/tickets", event.id),
        Some(json!({ "userId": user.id })),
    )
    .await;
    let ticket_id = as_uuid(&body["ticket"]["id"]);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/tickets/{ticket_id}/qr"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    let token = body["payload"]["t"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "POST", "/api/checkin", Some(json!({ "token": token }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(as_uuid(&body["ticketId"]), ticket_id);

    let (status, body) = send(&app, "POST", "/api/checkin", Some(json!({ "token": token }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["ok"], false);
    assert_eq!(body["reason"], "Already checked in");
}

#[tokio::test]
async fn redeeming_a_never_minted_token_is_invalid() {
    let app = app(Arc::new(MemoryStore::new()));
    let (status, body) = send(
        &app,
        "POST",
        "/api/checkin",
        Some(json!({ "token": "bogus-token" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["reason"], "Invalid code");
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = app(Arc::new(MemoryStore::new()));
    let (status, body) = send(&app, "POST", "/api/checkin", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "Missing token");
}

#[tokio::test]
async fn malformed_ticket_id_is_rejected_at_mint() {
    let app = app(Arc::new(MemoryStore::new()));
    let (status, body) = send(&app, "POST", "/api/tickets/not-a-uuid/qr", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "Invalid ticket id");
}

#[tokio::test]
async fn minting_for_a_missing_ticket_is_not_found() {
    let app = app(Arc::new(MemoryStore::new()));
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/tickets/{}/qr", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["reason"], "Ticket not found");
}
