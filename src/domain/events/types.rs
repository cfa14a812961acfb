//! Auth state change events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    /// Profile row changed (company joined or created)
    ProfileUpdated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub user_id: String,
    /// Set for events tied to one session
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuthEvent {
    pub fn new(kind: AuthEventKind, user_id: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            kind,
            user_id: user_id.into(),
            session_id,
            timestamp: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self.kind {
            AuthEventKind::SignedIn => "SIGNED_IN",
            AuthEventKind::SignedOut => "SIGNED_OUT",
            AuthEventKind::TokenRefreshed => "TOKEN_REFRESHED",
            AuthEventKind::ProfileUpdated => "PROFILE_UPDATED",
        }
    }

    /// Whether a context tracking `user_id` / `session_id` must re-resolve.
    ///
    /// Session-scoped events only concern the session they name; a
    /// sign-in elsewhere does not disturb this session.
    pub fn concerns(&self, user_id: Option<&str>, session_id: Option<&str>) -> bool {
        match self.kind {
            AuthEventKind::ProfileUpdated => user_id == Some(self.user_id.as_str()),
            _ => match (&self.session_id, session_id) {
                (Some(event_sid), Some(sid)) => event_sid == sid,
                (None, _) => user_id == Some(self.user_id.as_str()),
                (Some(_), None) => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_updates_concern_the_user() {
        let ev = AuthEvent::new(AuthEventKind::ProfileUpdated, "u1", None);
        assert!(ev.concerns(Some("u1"), Some("s9")));
        assert!(!ev.concerns(Some("u2"), Some("s9")));
        assert!(!ev.concerns(None, None));
    }

    #[test]
    fn session_events_concern_only_their_session() {
        let ev = AuthEvent::new(AuthEventKind::SignedOut, "u1", Some("s1".into()));
        assert!(ev.concerns(Some("u1"), Some("s1")));
        assert!(!ev.concerns(Some("u1"), Some("s2")));
        assert!(!ev.concerns(None, None));
    }

    #[test]
    fn serializes_kind_in_upper_case() {
        let ev = AuthEvent::new(AuthEventKind::TokenRefreshed, "u1", None);
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["kind"], "TOKEN_REFRESHED");
        assert_eq!(ev.event_type(), "TOKEN_REFRESHED");
    }
}
