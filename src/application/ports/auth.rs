//! Auth provider port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::application::events::EventSubscriber;
use crate::domain::identity::{AuthSession, Identity};
use crate::domain::invitation::Invitation;
use crate::domain::profile::Role;
use crate::domain::DomainResult;

/// Data stamped on the profile created at sign-up
#[derive(Debug, Clone)]
pub struct SignUpMetadata {
    pub full_name: String,
    pub role: Role,
    pub company_id: Option<String>,
    pub hourly_rate: Option<Decimal>,
}

impl SignUpMetadata {
    pub fn new(full_name: impl Into<String>, role: Role) -> Self {
        Self {
            full_name: full_name.into(),
            role,
            company_id: None,
            hourly_rate: None,
        }
    }
}

/// Result of a successful sign-in, refresh or invite acceptance
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until expiry
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub session_id: String,
    pub identity: Identity,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an identity and its profile. Does not sign the user in.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> DomainResult<Identity>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> DomainResult<IssuedSession>;

    /// Invalidate the session behind the token.
    async fn sign_out(&self, access_token: &str) -> DomainResult<()>;

    /// Extend the session and issue a fresh token for it.
    async fn refresh_session(&self, access_token: &str) -> DomainResult<IssuedSession>;

    /// Active session for a token. Invalid, expired and revoked tokens
    /// yield `Ok(None)`; errors are reserved for store failures.
    async fn get_session(&self, access_token: &str) -> DomainResult<Option<AuthSession>>;

    fn on_auth_state_change(&self) -> EventSubscriber;

    /// Privileged: create a pending invitation and deliver the link.
    async fn invite_user_by_email(
        &self,
        email: &str,
        metadata: SignUpMetadata,
        redirect_to: &str,
        invited_by: &str,
    ) -> DomainResult<Invitation>;

    /// Turn an invitation into an account and sign it in.
    async fn accept_invite(&self, token: &str, password: &str) -> DomainResult<IssuedSession>;
}
