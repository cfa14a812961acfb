//! Identity domain entities

use chrono::{DateTime, Utc};

/// Authenticated principal as seen by the rest of the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// Stored credentials for an identity
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl UserAccount {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

/// Input for account creation
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

/// Server-side session referenced by an access token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl AuthSession {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> AuthSession {
        let now = Utc::now();
        AuthSession {
            id: "s1".into(),
            identity: Identity {
                id: "u1".into(),
                email: "a@b.c".into(),
            },
            created_at: now,
            expires_at: now + expires_in,
            revoked,
        }
    }

    #[test]
    fn revoked_or_expired_sessions_are_inactive() {
        let now = Utc::now();
        assert!(session(Duration::hours(1), false).is_active(now));
        assert!(!session(Duration::hours(1), true).is_active(now));
        assert!(!session(Duration::seconds(-1), false).is_active(now));
    }
}
