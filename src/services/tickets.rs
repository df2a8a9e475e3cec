use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::models::Ticket;
use crate::store::{Store, StoreError, TicketInsert};

/// Reason strings are stable and shown to clients as-is.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("Invalid input: eventId and userId are required")]
    MissingInput,
    #[error("Event not found")]
    EventNotFound,
    #[error("Sold out or not enough capacity")]
    SoldOut,
    #[error("Authenticated user not found; cannot create tickets")]
    UserNotFound,
    #[error("Server error")]
    Storage(#[from] StoreError),
}

/// Decides whether a ticket may be created for a (user, event) pair and
/// creates it. Exactly `max_attendees` tickets are allowed per event; the
/// next request is rejected.
#[derive(Clone)]
pub struct TicketService {
    store: Arc<dyn Store>,
}

impl TicketService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn issue_ticket(
        &self,
        event_id: Option<Uuid>,
        user_id: Option<Uuid>,
    ) -> Result<Ticket, IssueError> {
        let (Some(event_id), Some(user_id)) = (event_id, user_id) else {
            return Err(IssueError::MissingInput);
        };

        let Some(event) = self.store.get_event(event_id).await? else {
            return Err(IssueError::EventNotFound);
        };

        // Early capacity read so a full event reports "sold out" even when
        // the user would not have resolved. The insert below re-checks
        // under a lock, which is the enforcement point.
        let issued = self.store.count_tickets_for_event(event_id).await?;
        if issued + 1 > i64::from(event.max_attendees) {
            return Err(IssueError::SoldOut);
        }

        // Guest users are never created implicitly.
        if self.store.get_user(user_id).await?.is_none() {
            return Err(IssueError::UserNotFound);
        }

        match self
            .store
            .insert_ticket_within_capacity(event_id, user_id)
            .await?
        {
            TicketInsert::Issued(ticket) => Ok(ticket),
            TicketInsert::SoldOut => Err(IssueError::SoldOut),
            TicketInsert::EventMissing => Err(IssueError::EventNotFound),
        }
    }
}
