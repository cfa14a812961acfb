//! Profile repository interface

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::model::Profile;
use crate::domain::DomainResult;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Profile>>;
    async fn list_employees(&self, company_id: &str) -> DomainResult<Vec<Profile>>;
    /// Set `company_id` only while it is still null. Returns whether a row
    /// was updated.
    async fn assign_company(&self, profile_id: &str, company_id: &str) -> DomainResult<bool>;
    /// Update the rate of an employee belonging to `company_id`.
    async fn set_hourly_rate(
        &self,
        profile_id: &str,
        company_id: &str,
        hourly_rate: Option<Decimal>,
    ) -> DomainResult<bool>;
}
