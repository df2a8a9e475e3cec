use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    /// Owning organization. Admin-created events have no owner.
    pub event_owner_id: Option<Uuid>,
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

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub event_owner_id: Option<Uuid>,
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
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
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
