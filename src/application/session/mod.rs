//! Session/role resolution
//!
//! `SessionResolver` turns an access token into a snapshot; `SessionContext`
//! keeps one snapshot current for a client by re-resolving on auth events.

pub mod context;
pub mod resolver;

pub use context::{SessionContext, SessionSubscription};
pub use resolver::{Resolved, SessionResolver};
