//! Geolocation source for clock actions arriving over HTTP
//!
//! The device resolves its own position; the request carries either the
//! coordinates or the reason they are missing.

use async_trait::async_trait;

use crate::application::ports::{GeolocationError, GeolocationProvider};
use crate::domain::time_entry::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportedPosition {
    Position(Coordinates),
    Error(GeolocationError),
    /// Client sent nothing; treated as an unsupported device.
    Missing,
}

#[async_trait]
impl GeolocationProvider for ReportedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        match self {
            Self::Position(c) => Ok(*c),
            Self::Error(e) => Err(*e),
            Self::Missing => Err(GeolocationError::Unsupported),
        }
    }
}
