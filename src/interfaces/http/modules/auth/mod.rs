//! Authentication module: sign-up, sign-in, invite acceptance, refresh, sign-out

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
