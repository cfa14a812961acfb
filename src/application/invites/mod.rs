//! Employee invitations

pub mod service;

pub use service::{InviteEmployee, InviteService};
