//! Identity aggregate
//!
//! Accounts owned by the auth provider and the sessions issued for them.

pub mod model;
pub mod repository;

pub use model::{AuthSession, Identity, NewAccount, UserAccount};
pub use repository::{SessionRepository, UserRepository};
