//! Invite function: `/functions/v1/invite-employee`
//!
//! Keeps the function-style contract of its callers: CORS preflight is
//! answered before anything else, success is `{data}` and every failure is
//! `{error}` with status 400.

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
