use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Event, EventPatch, NewEvent, NewOrganization, NewUser, Organization, OrganizationPatch,
    Ticket, TicketStatus, User, UserPatch, UserRole,
};
use crate::store::{EventTicketRollup, Store, StoreError, TicketInsert, TicketTotals};

#[derive(Default)]
struct Inner {
    events: Vec<Event>,
    users: Vec<User>,
    organizations: Vec<Organization>,
    tickets: Vec<Ticket>,
    attendees: HashSet<(Uuid, Uuid)>,
}

/// In-memory store used by tests. A single mutex makes every operation
/// atomic, which also satisfies the row-lock and conditional-update
/// contracts of the trait.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_event(&self, new: NewEvent) -> Result<Event, StoreError> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            event_owner_id: new.event_owner_id,
            title: new.title,
            description: new.description,
            date: new.date,
            location_name: new.location_name,
            latitude: new.latitude,
            longitude: new.longitude,
            max_attendees: new.max_attendees,
            cost: new.cost,
            tags: new.tags,
            image_url: new.image_url,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().events.push(event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let mut events = self.inner.lock().unwrap().events.clone();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn update_event(
        &self,
        id: Uuid,
        patch: EventPatch,
    ) -> Result<Option<Event>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(event) = inner.events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(date) = patch.date {
            event.date = date;
        }
        if let Some(location_name) = patch.location_name {
            event.location_name = location_name;
        }
        if let Some(latitude) = patch.latitude {
            event.latitude = Some(latitude);
        }
        if let Some(longitude) = patch.longitude {
            event.longitude = Some(longitude);
        }
        if let Some(max_attendees) = patch.max_attendees {
            event.max_attendees = max_attendees;
        }
        if let Some(cost) = patch.cost {
            event.cost = cost;
        }
        if let Some(tags) = patch.tags {
            event.tags = tags;
        }
        if let Some(image_url) = patch.image_url {
            event.image_url = Some(image_url);
        }
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.events.len();
        inner.attendees.retain(|(event_id, _)| *event_id != id);
        inner.tickets.retain(|t| t.event_id != id);
        inner.events.retain(|e| e.id != id);
        Ok(inner.events.len() < before)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            auth_id: new.auth_id,
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.lock().unwrap().users.clone())
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_user_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.role = role;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, auth_id: &str) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let position = inner.users.iter().position(|u| u.auth_id == auth_id);
        Ok(position.map(|i| inner.users.remove(i)))
    }

    async fn create_organization(
        &self,
        new: NewOrganization,
    ) -> Result<Organization, StoreError> {
        let now = Utc::now();
        let org = Organization {
            id: Uuid::new_v4(),
            auth_id: new.auth_id,
            email: new.email,
            org_name: new.org_name,
            is_approved: new.is_approved,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().organizations.push(org.clone());
        Ok(org)
    }

    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.organizations.iter().find(|o| o.id == id).cloned())
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        Ok(self.inner.lock().unwrap().organizations.clone())
    }

    async fn update_organization(
        &self,
        id: Uuid,
        patch: OrganizationPatch,
    ) -> Result<Option<Organization>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(org) = inner.organizations.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        if let Some(email) = patch.email {
            org.email = email;
        }
        if let Some(org_name) = patch.org_name {
            org.org_name = org_name;
        }
        org.updated_at = Utc::now();
        Ok(Some(org.clone()))
    }

    async fn set_organization_approved(
        &self,
        id: Uuid,
        approved: bool,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.organizations.iter_mut().find(|o| o.id == id) {
            Some(org) => {
                org.is_approved = approved;
                org.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_organization(
        &self,
        auth_id: &str,
    ) -> Result<Option<Organization>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let position = inner
            .organizations
            .iter()
            .position(|o| o.auth_id == auth_id);
        Ok(position.map(|i| inner.organizations.remove(i)))
    }

    async fn register_attendee(&self, event_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .attendees
            .insert((event_id, user_id));
        Ok(())
    }

    async fn deregister_attendee(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .attendees
            .remove(&(event_id, user_id));
        Ok(())
    }

    async fn attendees_for_event(&self, event_id: Uuid) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .filter(|u| inner.attendees.contains(&(event_id, u.id)))
            .cloned()
            .collect())
    }

    async fn events_for_user(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut events: Vec<Event> = inner
            .events
            .iter()
            .filter(|e| inner.attendees.contains(&(e.id, user_id)))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn attendee_counts(&self) -> Result<Vec<(Uuid, i64)>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for (event_id, _) in inner.attendees.iter() {
            *counts.entry(*event_id).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn insert_ticket_within_capacity(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<TicketInsert, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(event) = inner.events.iter().find(|e| e.id == event_id) else {
            return Ok(TicketInsert::EventMissing);
        };
        let capacity = event.max_attendees;
        let issued = inner
            .tickets
            .iter()
            .filter(|t| t.event_id == event_id)
            .count() as i64;
        if issued + 1 > i64::from(capacity) {
            return Ok(TicketInsert::SoldOut);
        }
        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            status: TicketStatus::Issued,
            qr_token: None,
            validated_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.tickets.push(ticket.clone());
        Ok(TicketInsert::Issued(ticket))
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<Ticket>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn count_tickets_for_event(&self, event_id: Uuid) -> Result<i64, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tickets
            .iter()
            .filter(|t| t.event_id == event_id)
            .count() as i64)
    }

    async fn tickets_for_event(&self, event_id: Uuid) -> Result<Vec<Ticket>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tickets
            .iter()
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn attach_qr_token(
        &self,
        ticket_id: Uuid,
        token: &str,
    ) -> Result<Option<Ticket>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(ticket) = inner.tickets.iter_mut().find(|t| t.id == ticket_id) else {
            return Ok(None);
        };
        ticket.qr_token = Some(token.to_string());
        ticket.status = TicketStatus::Issued;
        ticket.validated_at = None;
        ticket.updated_at = Utc::now();
        Ok(Some(ticket.clone()))
    }

    async fn find_ticket_by_token(&self, token: &str) -> Result<Option<Ticket>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tickets
            .iter()
            .find(|t| t.qr_token.as_deref() == Some(token))
            .cloned())
    }

    async fn check_in_ticket(
        &self,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(ticket) = inner
            .tickets
            .iter_mut()
            .find(|t| t.qr_token.as_deref() == Some(token) && t.status == TicketStatus::Issued)
        else {
            return Ok(None);
        };
        ticket.status = TicketStatus::CheckedIn;
        ticket.validated_at = Some(at);
        ticket.updated_at = at;
        Ok(Some(ticket.clone()))
    }

    async fn ticket_totals(&self) -> Result<TicketTotals, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(TicketTotals {
            events: inner.events.len() as i64,
            tickets: inner.tickets.len() as i64,
            checked_in: inner
                .tickets
                .iter()
                .filter(|t| t.status == TicketStatus::CheckedIn)
                .count() as i64,
        })
    }

    async fn ticket_rollup_by_event(&self) -> Result<Vec<EventTicketRollup>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<EventTicketRollup> = inner
            .events
            .iter()
            .map(|e| {
                let tickets: Vec<&Ticket> =
                    inner.tickets.iter().filter(|t| t.event_id == e.id).collect();
                EventTicketRollup {
                    event_date: e.date,
                    issued: tickets.len() as i64,
                    attended: tickets
                        .iter()
                        .filter(|t| t.status == TicketStatus::CheckedIn)
                        .count() as i64,
                }
            })
            .collect();
        rows.sort_by_key(|r| r.event_date);
        Ok(rows)
    }
}
