use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::TicketStatus;
use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Event not found")]
    EventNotFound,
    #[error("Server error")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnalytics {
    pub event_id: Uuid,
    pub event_title: String,
    pub event_date: DateTime<Utc>,
    pub organization_name: Option<String>,
    pub capacity: i64,
    pub tickets_issued: i64,
    pub attended: i64,
    pub not_attended: i64,
    pub remaining_capacity: i64,
    pub attendance_rate: f64,
    pub capacity_utilization: f64,
    pub is_event_past: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    pub tickets_issued: i64,
    pub attended: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAnalytics {
    pub num_events: i64,
    pub num_tickets: i64,
    pub total_attendance: i64,
    pub attendance_trend: Vec<WeekBucket>,
}

/// Monday-aligned start of the calendar week containing `date`.
/// `num_days_from_monday` treats Sunday as weekday 6, so a Sunday maps to
/// the previous Monday.
pub fn week_start(date: DateTime<Utc>) -> NaiveDate {
    let day = date.date_naive();
    day - Days::new(u64::from(day.weekday().num_days_from_monday()))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Read-only reducer over tickets and events. Pure arithmetic over
/// materialized query results; no state of its own.
#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn Store>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn event_analytics(&self, event_id: Uuid) -> Result<EventAnalytics, AnalyticsError> {
        let Some(event) = self.store.get_event(event_id).await? else {
            return Err(AnalyticsError::EventNotFound);
        };
        let organization_name = match event.event_owner_id {
            Some(owner_id) => self
                .store
                .get_organization(owner_id)
                .await?
                .map(|o| o.org_name),
            None => None,
        };

        let tickets = self.store.tickets_for_event(event_id).await?;
        let tickets_issued = tickets.len() as i64;
        let attended = tickets
            .iter()
            .filter(|t| t.status == TicketStatus::CheckedIn)
            .count() as i64;
        let capacity = i64::from(event.max_attendees);

        let attendance_rate = if tickets_issued == 0 {
            0.0
        } else {
            round1(attended as f64 / tickets_issued as f64 * 100.0)
        };
        let capacity_utilization = if capacity == 0 {
            0.0
        } else {
            round1(tickets_issued as f64 / capacity as f64 * 100.0)
        };

        Ok(EventAnalytics {
            event_id: event.id,
            event_title: event.title,
            event_date: event.date,
            organization_name,
            capacity,
            tickets_issued,
            attended,
            not_attended: tickets_issued - attended,
            remaining_capacity: (capacity - tickets_issued).max(0),
            attendance_rate,
            capacity_utilization,
            is_event_past: event.date < Utc::now(),
        })
    }

    pub async fn admin_analytics(&self) -> Result<AdminAnalytics, AnalyticsError> {
        let totals = self.store.ticket_totals().await?;

        // Every event contributes a bucket, including ticketless ones.
        let mut buckets: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
        for row in self.store.ticket_rollup_by_event().await? {
            let entry = buckets.entry(week_start(row.event_date)).or_insert((0, 0));
            entry.0 += row.issued;
            entry.1 += row.attended;
        }

        Ok(AdminAnalytics {
            num_events: totals.events,
            num_tickets: totals.tickets,
            total_attendance: totals.checked_in,
            attendance_trend: buckets
                .into_iter()
                .map(|(week_start, (tickets_issued, attended))| WeekBucket {
                    week_start,
                    tickets_issued,
                    attended,
                })
                .collect(),
        })
    }
}
