//! Time entry DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ports::GeolocationError;
use crate::application::timeclock::{ClockOutcome, ClockStatus};
use crate::domain::time_entry::{Coordinates, TimeEntry};
use crate::domain::DomainError;
use crate::infrastructure::ReportedPosition;
use crate::shared::format_duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PositionDto {
    pub latitude: f64,
    pub longitude: f64,
}

/// Geolocation result obtained by the client for a clock action.
///
/// Send `position` or `position_error`; an empty body means the device
/// has no geolocation support.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ClockRequest {
    pub position: Option<PositionDto>,
    /// `denied`, `unavailable`, `unsupported` or `timeout`
    pub position_error: Option<String>,
}

impl ClockRequest {
    pub fn reported(&self) -> Result<ReportedPosition, DomainError> {
        if let Some(p) = self.position {
            return Coordinates::new(p.latitude, p.longitude).map(ReportedPosition::Position);
        }
        match self.position_error.as_deref() {
            Some(raw) => GeolocationError::from_client(raw)
                .map(ReportedPosition::Error)
                .ok_or_else(|| {
                    DomainError::Validation(format!("unknown position_error: {}", raw))
                }),
            None => Ok(ReportedPosition::Missing),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimeEntryDto {
    pub id: String,
    pub user_id: String,
    pub company_id: String,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub clock_in_latitude: Option<f64>,
    pub clock_in_longitude: Option<f64>,
    pub clock_out_latitude: Option<f64>,
    pub clock_out_longitude: Option<f64>,
}

impl From<TimeEntry> for TimeEntryDto {
    fn from(e: TimeEntry) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            company_id: e.company_id,
            clock_in: e.clock_in,
            clock_out: e.clock_out,
            clock_in_latitude: e.clock_in_location.map(|c| c.latitude),
            clock_in_longitude: e.clock_in_location.map(|c| c.longitude),
            clock_out_latitude: e.clock_out_location.map(|c| c.latitude),
            clock_out_longitude: e.clock_out_location.map(|c| c.longitude),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClockStatusDto {
    /// `in` or `out`
    pub state: String,
    pub open_entry: Option<TimeEntryDto>,
    pub worked_seconds: Option<i64>,
    /// e.g. `2h 05m`
    pub worked: Option<String>,
}

impl From<ClockStatus> for ClockStatusDto {
    fn from(s: ClockStatus) -> Self {
        Self {
            state: s.state.as_str().to_string(),
            open_entry: s.open_entry.map(TimeEntryDto::from),
            worked_seconds: s.worked.map(|d| d.num_seconds()),
            worked: s.worked.map(format_duration),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClockOutcomeDto {
    pub entry: TimeEntryDto,
    /// Why no position was recorded, e.g. `geolocation_denied`
    pub geolocation_error: Option<String>,
}

impl From<ClockOutcome> for ClockOutcomeDto {
    fn from(o: ClockOutcome) -> Self {
        Self {
            entry: o.entry.into(),
            geolocation_error: o.geolocation_error.map(|e| e.code().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_is_missing_position() {
        assert_eq!(
            ClockRequest::default().reported().unwrap(),
            ReportedPosition::Missing
        );
    }

    #[test]
    fn position_wins_and_is_range_checked() {
        let req = ClockRequest {
            position: Some(PositionDto {
                latitude: -23.55,
                longitude: -46.63,
            }),
            position_error: None,
        };
        assert!(matches!(req.reported(), Ok(ReportedPosition::Position(_))));

        let req = ClockRequest {
            position: Some(PositionDto {
                latitude: 91.0,
                longitude: 0.0,
            }),
            position_error: None,
        };
        assert!(matches!(req.reported(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn client_errors_are_parsed() {
        let req = ClockRequest {
            position: None,
            position_error: Some("denied".into()),
        };
        assert_eq!(
            req.reported().unwrap(),
            ReportedPosition::Error(GeolocationError::PermissionDenied)
        );

        let req = ClockRequest {
            position: None,
            position_error: Some("lost".into()),
        };
        assert!(req.reported().is_err());
    }
}
