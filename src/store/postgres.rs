use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    Event, EventPatch, NewEvent, NewOrganization, NewUser, Organization, OrganizationPatch,
    Ticket, User, UserPatch, UserRole,
};
use crate::store::{EventTicketRollup, Store, StoreError, TicketInsert, TicketTotals};

/// Postgres-backed store. All queries are plain runtime queries so the
/// crate builds without a live database.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_event(&self, new: NewEvent) -> Result<Event, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, event_owner_id, title, description, date, location_name, \
             latitude, longitude, max_attendees, cost, tags, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(new.event_owner_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.date)
        .bind(&new.location_name)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(new.max_attendees)
        .bind(new.cost)
        .bind(&new.tags)
        .bind(&new.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let events = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date")
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn update_event(
        &self,
        id: Uuid,
        patch: EventPatch,
    ) -> Result<Option<Event>, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             date = COALESCE($4, date), \
             location_name = COALESCE($5, location_name), \
             latitude = COALESCE($6, latitude), \
             longitude = COALESCE($7, longitude), \
             max_attendees = COALESCE($8, max_attendees), \
             cost = COALESCE($9, cost), \
             tags = COALESCE($10, tags), \
             image_url = COALESCE($11, image_url), \
             updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.date)
        .bind(&patch.location_name)
        .bind(patch.latitude)
        .bind(patch.longitude)
        .bind(patch.max_attendees)
        .bind(patch.cost)
        .bind(&patch.tags)
        .bind(&patch.image_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, StoreError> {
        // Attendee links, tickets, and the event row go together or not
        // at all.
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM event_attendees WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tickets WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        Ok(deleted > 0)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, auth_id, email, first_name, last_name, role) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.auth_id)
        .bind(&new.email)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET \
             email = COALESCE($2, email), \
             first_name = COALESCE($3, first_name), \
             last_name = COALESCE($4, last_name), \
             updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.email)
        .bind(&patch.first_name)
        .bind(&patch.last_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_user_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreError> {
        let updated = sqlx::query("UPDATE users SET role = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(updated > 0)
    }

    async fn delete_user(&self, auth_id: &str) -> Result<Option<User>, StoreError> {
        let user =
            sqlx::query_as::<_, User>("DELETE FROM users WHERE auth_id = $1 RETURNING *")
                .bind(auth_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn create_organization(
        &self,
        new: NewOrganization,
    ) -> Result<Organization, StoreError> {
        let org = sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (id, auth_id, email, org_name, is_approved) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.auth_id)
        .bind(&new.email)
        .bind(&new.org_name)
        .bind(new.is_approved)
        .fetch_one(&self.pool)
        .await?;
        Ok(org)
    }

    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, StoreError> {
        let org =
            sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(org)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let orgs = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orgs)
    }

    async fn update_organization(
        &self,
        id: Uuid,
        patch: OrganizationPatch,
    ) -> Result<Option<Organization>, StoreError> {
        let org = sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET \
             email = COALESCE($2, email), \
             org_name = COALESCE($3, org_name), \
             updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&patch.email)
        .bind(&patch.org_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }

    async fn set_organization_approved(
        &self,
        id: Uuid,
        approved: bool,
    ) -> Result<bool, StoreError> {
        let updated = sqlx::query(
            "UPDATE organizations SET is_approved = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(approved)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(updated > 0)
    }

    async fn delete_organization(
        &self,
        auth_id: &str,
    ) -> Result<Option<Organization>, StoreError> {
        let org = sqlx::query_as::<_, Organization>(
            "DELETE FROM organizations WHERE auth_id = $1 RETURNING *",
        )
        .bind(auth_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }

    async fn register_attendee(&self, event_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO event_attendees (event_id, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn deregister_attendee(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM event_attendees WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn attendees_for_event(&self, event_id: Uuid) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT u.* FROM users u \
             JOIN event_attendees a ON a.user_id = u.id \
             WHERE a.event_id = $1 ORDER BY u.created_at",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn events_for_user(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT e.* FROM events e \
             JOIN event_attendees a ON a.event_id = e.id \
             WHERE a.user_id = $1 ORDER BY e.date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn attendee_counts(&self) -> Result<Vec<(Uuid, i64)>, StoreError> {
        let counts = sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT event_id, COUNT(*) FROM event_attendees GROUP BY event_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn insert_ticket_within_capacity(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<TicketInsert, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the event serializes concurrent issuance for the
        // same event; the count below is stable until commit.
        let capacity: Option<i32> =
            sqlx::query_scalar("SELECT max_attendees FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(capacity) = capacity else {
            return Ok(TicketInsert::EventMissing);
        };

        let issued: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?;
        if issued + 1 > i64::from(capacity) {
            return Ok(TicketInsert::SoldOut);
        }

        let ticket = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (id, event_id, user_id, status) \
             VALUES ($1, $2, $3, 'ISSUED') RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(TicketInsert::Issued(ticket))
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, StoreError> {
        let ticket = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    async fn count_tickets_for_event(&self, event_id: Uuid) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn tickets_for_event(&self, event_id: Uuid) -> Result<Vec<Ticket>, StoreError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE event_id = $1 ORDER BY created_at",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }

    async fn attach_qr_token(
        &self,
        ticket_id: Uuid,
        token: &str,
    ) -> Result<Option<Ticket>, StoreError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET qr_token = $2, status = 'ISSUED', validated_at = NULL, \
             updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(ticket_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ticket)
    }

    async fn find_ticket_by_token(&self, token: &str) -> Result<Option<Ticket>, StoreError> {
        let ticket = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE qr_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    async fn check_in_ticket(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, StoreError> {
        // Conditional update: two scans of the same token cannot both
        // match `status = 'ISSUED'`.
        let ticket = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET status = 'CHECKED_IN', validated_at = $2, updated_at = now() \
             WHERE qr_token = $1 AND status = 'ISSUED' RETURNING *",
        )
        .bind(token)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ticket)
    }

    async fn ticket_totals(&self) -> Result<TicketTotals, StoreError> {
        let totals = sqlx::query_as::<_, TicketTotals>(
            "SELECT (SELECT COUNT(*) FROM events) AS events, \
             (SELECT COUNT(*) FROM tickets) AS tickets, \
             (SELECT COUNT(*) FROM tickets WHERE status = 'CHECKED_IN') AS checked_in",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn ticket_rollup_by_event(&self) -> Result<Vec<EventTicketRollup>, StoreError> {
        let rows = sqlx::query_as::<_, EventTicketRollup>(
            "SELECT e.date AS event_date, COUNT(t.id) AS issued, \
             COUNT(t.id) FILTER (WHERE t.status = 'CHECKED_IN') AS attended \
             FROM events e LEFT JOIN tickets t ON t.event_id = e.id \
             GROUP BY e.id, e.date ORDER BY e.date",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
