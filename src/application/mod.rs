//! Application layer: use-cases orchestrating the domain through ports.

pub mod company;
pub mod events;
pub mod invites;
pub mod ports;
pub mod session;
pub mod timeclock;

pub use company::CompanyService;
pub use events::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use invites::InviteService;
pub use ports::{AuthProvider, GeolocationError, GeolocationProvider, Mailer};
pub use session::{SessionContext, SessionResolver};
pub use timeclock::TimeClockService;
