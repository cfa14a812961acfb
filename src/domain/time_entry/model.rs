//! Time entry domain entity

use chrono::{DateTime, Duration, Utc};

use crate::shared::DomainError;

/// A WGS84 position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::Validation(format!(
                "latitude out of range: {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::Validation(format!(
                "longitude out of range: {}",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Both halves of a stored pair must be present.
    pub fn from_pair(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Clocked in or out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Out,
    In,
}

impl ClockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Out => "out",
            Self::In => "in",
        }
    }
}

/// One work period
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
    pub id: String,
    pub user_id: String,
    pub company_id: String,
    pub clock_in: DateTime<Utc>,
    /// None while the entry is open
    pub clock_out: Option<DateTime<Utc>>,
    pub clock_in_location: Option<Coordinates>,
    pub clock_out_location: Option<Coordinates>,
}

impl TimeEntry {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Elapsed time of the entry. Open entries are measured up to `now`.
    pub fn worked_duration(&self, now: DateTime<Utc>) -> Duration {
        let end = self.clock_out.unwrap_or(now);
        (end - self.clock_in).max(Duration::zero())
    }
}

/// Data for an entry created on clock-in
#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub id: String,
    pub user_id: String,
    pub company_id: String,
    pub clock_in: DateTime<Utc>,
    pub clock_in_location: Option<Coordinates>,
}

impl NewTimeEntry {
    pub fn into_entry(self) -> TimeEntry {
        TimeEntry {
            id: self.id,
            user_id: self.user_id,
            company_id: self.company_id,
            clock_in: self.clock_in,
            clock_out: None,
            clock_in_location: self.clock_in_location,
            clock_out_location: None,
        }
    }
}

/// Company-wide listing filter
#[derive(Debug, Clone, Default)]
pub struct TimeEntryFilter {
    pub user_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub open_only: bool,
}
