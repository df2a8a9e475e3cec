pub mod analytics;
pub mod calendar;
pub mod qr;
pub mod tickets;

pub use analytics::AnalyticsService;
pub use qr::QrService;
pub use tickets::TicketService;
