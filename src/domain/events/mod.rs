//! Domain events
//!
//! Facts about authentication state that session contexts react to.
//! The EventBus implementation lives in `application::events`.

pub mod types;

pub use types::{AuthEvent, AuthEventKind};
