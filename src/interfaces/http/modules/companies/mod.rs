//! Company module: create, join and administer a company

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
