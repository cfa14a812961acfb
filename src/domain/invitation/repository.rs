//! Invitation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::Invitation;
use crate::domain::DomainResult;

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn create(&self, invitation: Invitation) -> DomainResult<Invitation>;
    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<Invitation>>;
    /// Marks a still-pending invitation as accepted. Returns false if it
    /// was already accepted.
    async fn mark_accepted(&self, id: &str, at: DateTime<Utc>) -> DomainResult<bool>;
}
