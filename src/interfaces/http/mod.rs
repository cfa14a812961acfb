//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, route guard
//! - `middleware`: bearer authentication into a resolved session
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

#[cfg(test)]
mod tests;

pub use router::{create_router, ApiDoc};
pub use state::AppState;
