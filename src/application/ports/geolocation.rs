//! Device position port

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::time_entry::Coordinates;

/// Why a position could not be obtained. Never fatal to a clock action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable")]
    PositionUnavailable,
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Location request timed out")]
    Timeout,
}

impl GeolocationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "geolocation_denied",
            Self::PositionUnavailable => "geolocation_unavailable",
            Self::Unsupported => "geolocation_unsupported",
            Self::Timeout => "geolocation_timeout",
        }
    }

    /// Parse the short form reported by clients.
    pub fn from_client(s: &str) -> Option<Self> {
        match s {
            "denied" => Some(Self::PermissionDenied),
            "unavailable" => Some(Self::PositionUnavailable),
            "unsupported" => Some(Self::Unsupported),
            "timeout" => Some(Self::Timeout),
            _ => None,
        }
    }
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// One-shot position request.
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}
