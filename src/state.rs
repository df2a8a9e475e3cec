use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::services::{AnalyticsService, QrService, TicketService};
use crate::store::Store;

/// Shared dependencies, passed to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub tickets: TicketService,
    pub qr: QrService,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            tickets: TicketService::new(store.clone()),
            qr: QrService::new(store.clone()),
            analytics: AnalyticsService::new(store.clone()),
            store,
            identity,
        }
    }
}
