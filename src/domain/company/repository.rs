//! Company repository interface

use async_trait::async_trait;

use super::model::{Company, CompanyCode};
use crate::domain::DomainResult;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Company>>;
    async fn find_by_code(&self, code: &CompanyCode) -> DomainResult<Option<Company>>;
    /// Insert the company and attach it to the owner's profile atomically.
    ///
    /// Errors: `AlreadyInCompany` when the owner's profile already has a
    /// company, `Conflict` when the code is taken.
    async fn create_with_owner(&self, company: Company) -> DomainResult<Company>;
}
