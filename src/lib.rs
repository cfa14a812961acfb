//! # Time Clock Service
//!
//! Multi-tenant time clock: owners create a company and share its join code,
//! employees join it and clock in and out with an optional position.
//!
//! ## Architecture
//!
//! - **domain**: entities, the membership gate and repository traits
//! - **application**: session resolution, company, time clock and invite use cases
//! - **infrastructure**: SeaORM storage, local auth provider, mailer, geolocation
//! - **interfaces**: REST API with Swagger documentation and the session stream
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig};

pub use interfaces::http::create_router;

pub use application::{create_event_bus, SharedEventBus};
