use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::TicketStatus;
use crate::store::{Store, StoreError};
use crate::utils::token::new_qr_token;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("Ticket not found")]
    TicketNotFound,
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid code")]
    InvalidCode,
    #[error("Already checked in")]
    AlreadyCheckedIn,
    #[error("Server error")]
    Storage(#[from] StoreError),
}

/// Binds an unguessable token to a ticket and redeems it exactly once.
///
/// Minting a fresh token always forces the ticket back to `ISSUED` and
/// clears `validated_at`, so a checked-in ticket can be reset by requesting
/// a new code. That mirrors how re-issuing a physical pass behaves; the
/// tradeoff is recorded in DESIGN.md.
#[derive(Clone)]
pub struct QrService {
    store: Arc<dyn Store>,
}

impl QrService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Mints a new token for the ticket, overwriting any previous one.
    /// Only the most recently minted token is redeemable.
    pub async fn mint_token(&self, ticket_id: Uuid) -> Result<String, QrError> {
        let token = new_qr_token();
        match self.store.attach_qr_token(ticket_id, &token).await? {
            Some(_) => Ok(token),
            None => Err(QrError::TicketNotFound),
        }
    }

    /// Redeems a token, transitioning the ticket `ISSUED -> CHECKED_IN`
    /// and stamping `validated_at`. Returns the checked-in ticket id.
    pub async fn redeem_token(&self, token: &str) -> Result<Uuid, QrError> {
        if token.is_empty() {
            return Err(QrError::MissingToken);
        }

        // The store only flips tickets that are still ISSUED, so a second
        // scan of the same token falls through to the classification below.
        if let Some(ticket) = self.store.check_in_ticket(token, Utc::now()).await? {
            return Ok(ticket.id);
        }

        match self.store.find_ticket_by_token(token).await? {
            Some(ticket) if ticket.status == TicketStatus::CheckedIn => {
                Err(QrError::AlreadyCheckedIn)
            }
            _ => Err(QrError::InvalidCode),
        }
    }
}
