//! Time entry module: clock state, clock-in/out and own history

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
