//! Auth provider backed by the local users/sessions tables
//!
//! Passwords are bcrypt hashed, access tokens are HS256 JWTs naming a
//! server-side session row. Revoking the row invalidates the token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::events::{EventSubscriber, SharedEventBus};
use crate::application::ports::{AuthProvider, IssuedSession, Mailer, SignUpMetadata};
use crate::domain::events::{AuthEvent, AuthEventKind};
use crate::domain::identity::{AuthSession, Identity, NewAccount};
use crate::domain::invitation::Invitation;
use crate::domain::profile::{NewProfile, Role};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig, TokenClaims};
use crate::infrastructure::crypto::password::{hash_password, verify_password, DEFAULT_COST};
use crate::infrastructure::crypto::token::{generate_token, hash_token};
use crate::shared::store_now;

pub const MIN_PASSWORD_LEN: usize = 6;

pub struct LocalAuthProvider {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
    invite_ttl: Duration,
    mailer: Arc<dyn Mailer>,
    events: SharedEventBus,
}

impl LocalAuthProvider {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        mailer: Arc<dyn Mailer>,
        events: SharedEventBus,
    ) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost: DEFAULT_COST,
            invite_ttl: Duration::hours(72),
            mailer,
            events,
        }
    }

    pub fn with_invite_ttl_hours(mut self, hours: i64) -> Self {
        self.invite_ttl = Duration::hours(hours);
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn events(&self) -> &SharedEventBus {
        &self.events
    }

    async fn hash(&self, password: &str) -> DomainResult<String> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| DomainError::Internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }

    async fn verify(&self, password: &str, hash: &str) -> bool {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash).unwrap_or(false))
            .await
            .unwrap_or(false)
    }

    fn decode(&self, access_token: &str) -> Option<TokenClaims> {
        match verify_token(access_token, &self.jwt_config) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Rejected access token: {}", e);
                None
            }
        }
    }

    fn issue_token(&self, session: &AuthSession) -> DomainResult<IssuedSession> {
        let claims = TokenClaims::new(
            &session.identity.id,
            &session.id,
            &session.identity.email,
            session.expires_at,
            &self.jwt_config,
        );
        let access_token = create_token(&claims, &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;
        Ok(IssuedSession {
            access_token,
            token_type: "Bearer".into(),
            expires_in: (session.expires_at - Utc::now()).num_seconds().max(0),
            expires_at: session.expires_at,
            session_id: session.id.clone(),
            identity: session.identity.clone(),
        })
    }

    async fn start_session(&self, identity: Identity) -> DomainResult<IssuedSession> {
        let now = store_now();
        let session = AuthSession {
            id: Uuid::new_v4().to_string(),
            identity,
            created_at: now,
            expires_at: now + Duration::hours(self.jwt_config.expiration_hours),
            revoked: false,
        };
        self.repos.sessions().create(session.clone()).await?;
        self.repos
            .users()
            .touch_last_sign_in(&session.identity.id, now)
            .await?;
        let issued = self.issue_token(&session)?;
        self.events.publish(AuthEvent::new(
            AuthEventKind::SignedIn,
            session.identity.id.clone(),
            Some(session.id.clone()),
        ));
        info!(user_id = %session.identity.id, session_id = %session.id, "Signed in");
        Ok(issued)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password should be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn invite_link(redirect_to: &str, token: &str) -> String {
    let sep = if redirect_to.contains('?') { '&' } else { '?' };
    format!("{}{}invite_token={}", redirect_to, sep, token)
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> DomainResult<Identity> {
        check_password(password)?;
        let email = normalize_email(email);
        let password_hash = self.hash(password).await?;

        let account = NewAccount {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash,
        };
        let profile = NewProfile {
            full_name: metadata.full_name,
            email,
            role: metadata.role,
            company_id: metadata.company_id,
            hourly_rate: metadata.hourly_rate,
        };
        let created = self.repos.users().create_with_profile(account, profile).await?;
        info!(user_id = %created.id, role = metadata.role.as_str(), "User signed up");
        Ok(created.identity())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> DomainResult<IssuedSession> {
        let email = normalize_email(email);
        let Some(account) = self.repos.users().find_by_email(&email).await? else {
            return Err(DomainError::Unauthorized("Invalid login credentials".into()));
        };
        if !self.verify(password, &account.password_hash).await {
            warn!(user_id = %account.id, "Failed sign-in attempt");
            return Err(DomainError::Unauthorized("Invalid login credentials".into()));
        }
        self.start_session(account.identity()).await
    }

    async fn sign_out(&self, access_token: &str) -> DomainResult<()> {
        let Some(claims) = self.decode(access_token) else {
            return Err(DomainError::Unauthorized("Invalid access token".into()));
        };
        if self.repos.sessions().revoke(&claims.sid).await? {
            self.events.publish(AuthEvent::new(
                AuthEventKind::SignedOut,
                claims.sub.clone(),
                Some(claims.sid.clone()),
            ));
            info!(user_id = %claims.sub, session_id = %claims.sid, "Signed out");
        }
        Ok(())
    }

    async fn refresh_session(&self, access_token: &str) -> DomainResult<IssuedSession> {
        let Some(mut session) = self.get_session(access_token).await? else {
            return Err(DomainError::Unauthorized("Session expired or revoked".into()));
        };
        let expires_at = store_now() + Duration::hours(self.jwt_config.expiration_hours);
        if !self.repos.sessions().extend(&session.id, expires_at).await? {
            return Err(DomainError::Unauthorized("Session expired or revoked".into()));
        }
        session.expires_at = expires_at;
        let issued = self.issue_token(&session)?;
        self.events.publish(AuthEvent::new(
            AuthEventKind::TokenRefreshed,
            session.identity.id.clone(),
            Some(session.id.clone()),
        ));
        Ok(issued)
    }

    async fn get_session(&self, access_token: &str) -> DomainResult<Option<AuthSession>> {
        let Some(claims) = self.decode(access_token) else {
            return Ok(None);
        };
        let session = self.repos.sessions().find_by_id(&claims.sid).await?;
        Ok(session.filter(|s| s.identity.id == claims.sub && s.is_active(Utc::now())))
    }

    fn on_auth_state_change(&self) -> EventSubscriber {
        self.events.subscribe()
    }

    async fn invite_user_by_email(
        &self,
        email: &str,
        metadata: SignUpMetadata,
        redirect_to: &str,
        invited_by: &str,
    ) -> DomainResult<Invitation> {
        let email = normalize_email(email);
        if metadata.role != Role::Employee {
            return Err(DomainError::Validation("Only employees can be invited".into()));
        }
        let Some(company_id) = metadata.company_id else {
            return Err(DomainError::Validation("Invitation requires a company".into()));
        };
        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(
                "A user with this email address has already been registered".into(),
            ));
        }

        let token = generate_token();
        let now = store_now();
        let invitation = self
            .repos
            .invitations()
            .create(Invitation {
                id: Uuid::new_v4().to_string(),
                email,
                full_name: metadata.full_name,
                company_id,
                hourly_rate: metadata.hourly_rate,
                redirect_to: redirect_to.to_string(),
                invited_by: invited_by.to_string(),
                token_hash: hash_token(&token),
                created_at: now,
                expires_at: now + self.invite_ttl,
                accepted_at: None,
            })
            .await?;

        self.mailer
            .send_invite(&invitation, &invite_link(redirect_to, &token))
            .await?;
        info!(
            invitation_id = %invitation.id,
            company_id = %invitation.company_id,
            "Invitation created"
        );
        Ok(invitation)
    }

    async fn accept_invite(&self, token: &str, password: &str) -> DomainResult<IssuedSession> {
        let invalid = || DomainError::Unauthorized("Invite link is invalid or has expired".into());
        let Some(invitation) = self
            .repos
            .invitations()
            .find_by_token_hash(&hash_token(token))
            .await?
        else {
            return Err(invalid());
        };
        if !invitation.is_pending(Utc::now()) {
            return Err(invalid());
        }
        check_password(password)?;

        let password_hash = self.hash(password).await?;
        let account = NewAccount {
            id: Uuid::new_v4().to_string(),
            email: invitation.email.clone(),
            password_hash,
        };
        let profile = NewProfile {
            full_name: invitation.full_name.clone(),
            email: invitation.email.clone(),
            role: Role::Employee,
            company_id: Some(invitation.company_id.clone()),
            hourly_rate: invitation.hourly_rate,
        };
        let created = self.repos.users().create_with_profile(account, profile).await?;
        if !self
            .repos
            .invitations()
            .mark_accepted(&invitation.id, store_now())
            .await?
        {
            warn!(invitation_id = %invitation.id, "Invitation accepted concurrently");
        }
        info!(user_id = %created.id, invitation_id = %invitation.id, "Invitation accepted");
        self.start_session(created.identity()).await
    }
}
