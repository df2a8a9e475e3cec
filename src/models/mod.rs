pub mod event;
pub mod organization;
pub mod tag;
pub mod ticket;
pub mod user;

pub use event::{Event, EventPatch, NewEvent};
pub use organization::{NewOrganization, Organization, OrganizationPatch};
pub use ticket::{Ticket, TicketStatus};
pub use user::{NewUser, User, UserPatch, UserRole};
