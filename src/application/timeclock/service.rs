//! Time clock service
//!
//! OUT -> IN -> OUT state machine over the `time_entries` table. The store
//! guarantees at most one open entry per user; this service adds a
//! duplicate-submission guard and the geolocation enrichment.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::{info, warn};
use uuid::Uuid;

use super::geolocation::GeolocationCapture;
use super::in_flight::{InFlightActions, InFlightGuard};
use crate::application::ports::{GeolocationError, GeolocationProvider};
use crate::domain::profile::Role;
use crate::domain::session::Actor;
use crate::domain::time_entry::{ClockState, Coordinates, NewTimeEntry, TimeEntry};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{store_now, PaginatedResult, PaginationParams};

/// Current clock state of a user
#[derive(Debug, Clone)]
pub struct ClockStatus {
    pub state: ClockState,
    pub open_entry: Option<TimeEntry>,
    /// Elapsed time of the open entry, derived on read
    pub worked: Option<chrono::Duration>,
}

/// Result of a successful clock action.
///
/// A missing position never fails the action; the reason is reported here.
#[derive(Debug, Clone)]
pub struct ClockOutcome {
    pub entry: TimeEntry,
    pub geolocation_error: Option<GeolocationError>,
}

pub struct TimeClockService {
    repos: Arc<dyn RepositoryProvider>,
    in_flight: InFlightActions,
    geolocation_timeout: Duration,
}

impl TimeClockService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, geolocation_timeout: Duration) -> Self {
        Self {
            repos,
            in_flight: InFlightActions::new(),
            geolocation_timeout,
        }
    }

    pub async fn current_state(&self, actor: &Actor) -> DomainResult<ClockStatus> {
        require_employee(actor)?;
        let open = self
            .repos
            .time_entries()
            .find_open_for_user(actor.user_id())
            .await?;
        Ok(match open {
            Some(entry) => ClockStatus {
                state: ClockState::In,
                worked: Some(entry.worked_duration(chrono::Utc::now())),
                open_entry: Some(entry),
            },
            None => ClockStatus {
                state: ClockState::Out,
                open_entry: None,
                worked: None,
            },
        })
    }

    pub async fn clock_in(
        &self,
        actor: &Actor,
        geolocation: &dyn GeolocationProvider,
    ) -> DomainResult<ClockOutcome> {
        let company_id = require_employee(actor)?;
        let user_id = actor.user_id();
        let _guard = self.begin(user_id)?;

        if self
            .repos
            .time_entries()
            .find_open_for_user(user_id)
            .await?
            .is_some()
        {
            counter!("timeclock_clock_conflicts_total", "action" => "clock_in").increment(1);
            return Err(DomainError::AlreadyClockedIn);
        }

        let (location, geolocation_error) = self.locate(geolocation).await;
        let inserted = self
            .repos
            .time_entries()
            .insert_open(NewTimeEntry {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                company_id: company_id.to_string(),
                clock_in: store_now(),
                clock_in_location: location,
            })
            .await;

        let entry = match inserted {
            Ok(entry) => entry,
            Err(DomainError::AlreadyClockedIn) => {
                counter!("timeclock_clock_conflicts_total", "action" => "clock_in").increment(1);
                return Err(DomainError::AlreadyClockedIn);
            }
            Err(e) => return Err(e),
        };

        counter!("timeclock_clock_in_total").increment(1);
        info!(
            user_id,
            company_id,
            entry_id = %entry.id,
            located = location.is_some(),
            "Clocked in"
        );
        Ok(ClockOutcome {
            entry,
            geolocation_error,
        })
    }

    pub async fn clock_out(
        &self,
        actor: &Actor,
        entry_id: &str,
        geolocation: &dyn GeolocationProvider,
    ) -> DomainResult<ClockOutcome> {
        require_employee(actor)?;
        let user_id = actor.user_id();
        let _guard = self.begin(user_id)?;

        // Fail fast before asking for a position
        let existing = self.repos.time_entries().find_by_id(entry_id).await?;
        match &existing {
            Some(entry) if entry.user_id == user_id => {
                if !entry.is_open() {
                    counter!("timeclock_clock_conflicts_total", "action" => "clock_out")
                        .increment(1);
                    return Err(DomainError::ClockStateChanged(entry_id.to_string()));
                }
            }
            _ => return Err(entry_not_found(entry_id)),
        }

        let (location, geolocation_error) = self.locate(geolocation).await;
        let closed = self
            .repos
            .time_entries()
            .close_open(entry_id, user_id, store_now(), location)
            .await?;

        let Some(entry) = closed else {
            // Closed by someone else between the check and the update
            counter!("timeclock_clock_conflicts_total", "action" => "clock_out").increment(1);
            warn!(user_id, entry_id, "Entry closed concurrently");
            return Err(DomainError::ClockStateChanged(entry_id.to_string()));
        };

        counter!("timeclock_clock_out_total").increment(1);
        info!(user_id, entry_id, located = location.is_some(), "Clocked out");
        Ok(ClockOutcome {
            entry,
            geolocation_error,
        })
    }

    pub async fn history(
        &self,
        actor: &Actor,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<TimeEntry>> {
        require_employee(actor)?;
        self.repos
            .time_entries()
            .list_for_user(actor.user_id(), pagination)
            .await
    }

    fn begin(&self, user_id: &str) -> DomainResult<InFlightGuard> {
        self.in_flight
            .try_begin(user_id)
            .ok_or(DomainError::ActionInProgress)
    }

    async fn locate(
        &self,
        provider: &dyn GeolocationProvider,
    ) -> (Option<Coordinates>, Option<GeolocationError>) {
        let capture = GeolocationCapture::new(self.geolocation_timeout);
        match capture.capture(provider).await {
            Ok(position) => (Some(position), None),
            Err(e) => {
                counter!("timeclock_geolocation_failures_total", "reason" => e.code())
                    .increment(1);
                (None, Some(e))
            }
        }
    }
}

fn require_employee(actor: &Actor) -> DomainResult<&str> {
    if actor.profile.role != Role::Employee {
        return Err(DomainError::Forbidden(
            "Only employees can use the time clock".into(),
        ));
    }
    actor.company_id()
}

fn entry_not_found(id: &str) -> DomainError {
    DomainError::NotFound {
        entity: "TimeEntry",
        field: "id",
        value: id.to_string(),
    }
}
