use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Event, EventPatch, NewEvent, NewOrganization, NewUser, Organization, OrganizationPatch,
    Ticket, User, UserPatch, UserRole,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// Outcome of the capacity-guarded ticket insert. The check and the insert
/// run as one atomic unit inside the store, so two requests racing for the
/// last slot cannot both succeed.
#[derive(Debug)]
pub enum TicketInsert {
    Issued(Ticket),
    SoldOut,
    EventMissing,
}

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct TicketTotals {
    pub events: i64,
    pub tickets: i64,
    pub checked_in: i64,
}

/// One row per event for trend aggregation: when the event runs and how many
/// tickets were issued and redeemed for it. Events with no tickets appear
/// with zero counts.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct EventTicketRollup {
    pub event_date: DateTime<Utc>,
    pub issued: i64,
    pub attended: i64,
}

/// Data-access boundary for the whole application. The Postgres
/// implementation backs the server; the in-memory implementation backs
/// tests.
#[async_trait]
pub trait Store: Send + Sync {
    // ── Events ───────────────────────────────────────────────
    async fn create_event(&self, new: NewEvent) -> Result<Event, StoreError>;
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, StoreError>;
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;
    async fn update_event(&self, id: Uuid, patch: EventPatch)
        -> Result<Option<Event>, StoreError>;
    /// Deletes attendee links, tickets, and the event row in one
    /// transaction. Returns false when the event does not exist.
    async fn delete_event(&self, id: Uuid) -> Result<bool, StoreError>;

    // ── Users ────────────────────────────────────────────────
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, StoreError>;
    async fn set_user_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreError>;
    /// Returns the deleted user so callers can report what was removed.
    async fn delete_user(&self, auth_id: &str) -> Result<Option<User>, StoreError>;

    // ── Organizations ────────────────────────────────────────
    async fn create_organization(&self, new: NewOrganization)
        -> Result<Organization, StoreError>;
    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, StoreError>;
    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError>;
    async fn update_organization(
        &self,
        id: Uuid,
        patch: OrganizationPatch,
    ) -> Result<Option<Organization>, StoreError>;
    async fn set_organization_approved(&self, id: Uuid, approved: bool)
        -> Result<bool, StoreError>;
    async fn delete_organization(&self, auth_id: &str)
        -> Result<Option<Organization>, StoreError>;

    // ── Attendee links ───────────────────────────────────────
    /// Idempotent: linking an already-linked user is a no-op.
    async fn register_attendee(&self, event_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;
    async fn deregister_attendee(&self, event_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;
    async fn attendees_for_event(&self, event_id: Uuid) -> Result<Vec<User>, StoreError>;
    async fn events_for_user(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError>;
    /// Attendee-link counts keyed by event; events without links are absent.
    async fn attendee_counts(&self) -> Result<Vec<(Uuid, i64)>, StoreError>;

    // ── Tickets ──────────────────────────────────────────────
    /// Capacity-guarded insert: locks the event row, counts existing
    /// tickets, and inserts only when `count + 1 <= max_attendees`.
    async fn insert_ticket_within_capacity(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<TicketInsert, StoreError>;
    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, StoreError>;
    async fn count_tickets_for_event(&self, event_id: Uuid) -> Result<i64, StoreError>;
    async fn tickets_for_event(&self, event_id: Uuid) -> Result<Vec<Ticket>, StoreError>;
    /// Stores a freshly minted token, forcing the ticket back to `ISSUED`
    /// and clearing `validated_at`. Returns the updated ticket, or None
    /// when the ticket does not exist.
    async fn attach_qr_token(&self, ticket_id: Uuid, token: &str)
        -> Result<Option<Ticket>, StoreError>;
    async fn find_ticket_by_token(&self, token: &str) -> Result<Option<Ticket>, StoreError>;
    /// Conditional check-in: flips `ISSUED -> CHECKED_IN` and stamps
    /// `validated_at` only when the token matches a still-issued ticket.
    /// Returns None when no such row was updated.
    async fn check_in_ticket(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, StoreError>;

    // ── Aggregates ───────────────────────────────────────────
    async fn ticket_totals(&self) -> Result<TicketTotals, StoreError>;
    async fn ticket_rollup_by_event(&self) -> Result<Vec<EventTicketRollup>, StoreError>;
}
