//! Identity repository interfaces

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{AuthSession, NewAccount, UserAccount};
use crate::domain::profile::NewProfile;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the account and its profile in one store transaction.
    /// A duplicate email yields `DomainError::Conflict`.
    async fn create_with_profile(
        &self,
        account: NewAccount,
        profile: NewProfile,
    ) -> DomainResult<UserAccount>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<UserAccount>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<UserAccount>>;
    async fn set_password(&self, id: &str, password_hash: &str) -> DomainResult<()>;
    async fn touch_last_sign_in(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: AuthSession) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<AuthSession>>;
    /// Push the expiry of a live session. Returns false when the session
    /// is revoked or unknown.
    async fn extend(&self, id: &str, expires_at: DateTime<Utc>) -> DomainResult<bool>;
    /// Returns false when the session was already revoked or unknown.
    async fn revoke(&self, id: &str) -> DomainResult<bool>;
}
