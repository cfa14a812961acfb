//! Time entry repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Coordinates, NewTimeEntry, TimeEntry, TimeEntryFilter};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    /// Latest entry of the user with a null `clock_out`.
    async fn find_open_for_user(&self, user_id: &str) -> DomainResult<Option<TimeEntry>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<TimeEntry>>;
    /// Insert an open entry. Fails with `AlreadyClockedIn` when the user
    /// already has one.
    async fn insert_open(&self, entry: NewTimeEntry) -> DomainResult<TimeEntry>;
    /// Close the entry only if it belongs to `user_id` and is still open.
    /// Returns None when no row matched.
    async fn close_open(
        &self,
        entry_id: &str,
        user_id: &str,
        clock_out: DateTime<Utc>,
        location: Option<Coordinates>,
    ) -> DomainResult<Option<TimeEntry>>;
    async fn list_for_user(
        &self,
        user_id: &str,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<TimeEntry>>;
    async fn list_for_company(
        &self,
        company_id: &str,
        filter: TimeEntryFilter,
        pagination: PaginationParams,
    ) -> DomainResult<PaginatedResult<TimeEntry>>;
    /// Every entry of the company whose clock-in falls inside the range.
    async fn list_for_company_in_range(
        &self,
        company_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DomainResult<Vec<TimeEntry>>;
}
