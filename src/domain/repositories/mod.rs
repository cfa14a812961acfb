//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::company::CompanyRepository;
use super::identity::{SessionRepository, UserRepository};
use super::invitation::InvitationRepository;
use super::profile::ProfileRepository;
use super::time_entry::TimeEntryRepository;
use crate::shared::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let profile = repos.profiles().find_by_id(user_id).await?;
///     let open = repos.time_entries().find_open_for_user(user_id).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn sessions(&self) -> &dyn SessionRepository;
    fn profiles(&self) -> &dyn ProfileRepository;
    fn companies(&self) -> &dyn CompanyRepository;
    fn time_entries(&self) -> &dyn TimeEntryRepository;
    fn invitations(&self) -> &dyn InvitationRepository;
}
