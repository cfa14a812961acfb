//! Application ports (hexagonal architecture boundaries)
//!
//! Outbound collaborators the services depend on: the auth provider,
//! invite delivery and the device geolocation source.

pub mod auth;
pub mod geolocation;
pub mod mailer;

pub use auth::{AuthProvider, IssuedSession, SignUpMetadata};
pub use geolocation::{GeolocationError, GeolocationProvider};
pub use mailer::Mailer;
