//! Domain layer: aggregates, repository interfaces and the membership gate.

pub mod company;
pub mod events;
pub mod identity;
pub mod invitation;
pub mod profile;
pub mod repositories;
pub mod session;
pub mod time_entry;

pub use company::{Company, CompanyCode};
pub use events::{AuthEvent, AuthEventKind};
pub use identity::{AuthSession, Identity, UserAccount};
pub use invitation::Invitation;
pub use profile::{Profile, Role};
pub use repositories::{DomainResult, RepositoryProvider};
pub use session::{decide_route, Actor, Route, SessionSnapshot};
pub use time_entry::{ClockState, Coordinates, TimeEntry};

pub use crate::shared::DomainError;
