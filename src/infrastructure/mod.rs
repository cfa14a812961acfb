//! Infrastructure layer - external concerns

pub mod auth;
pub mod crypto;
pub mod database;
pub mod geolocation;
pub mod mail;

pub use auth::LocalAuthProvider;
pub use database::{init_database, DatabaseConfig};
pub use geolocation::ReportedPosition;
pub use mail::LogMailer;
