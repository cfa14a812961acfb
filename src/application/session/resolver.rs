use std::sync::Arc;

use tracing::warn;

use crate::application::ports::AuthProvider;
use crate::domain::identity::AuthSession;
use crate::domain::session::SessionSnapshot;
use crate::domain::{DomainResult, RepositoryProvider};

/// Outcome of one resolution
#[derive(Debug, Clone)]
pub struct Resolved {
    pub session: Option<AuthSession>,
    pub snapshot: SessionSnapshot,
}

impl Resolved {
    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }
}

pub struct SessionResolver {
    auth: Arc<dyn AuthProvider>,
    repos: Arc<dyn RepositoryProvider>,
}

impl SessionResolver {
    pub fn new(auth: Arc<dyn AuthProvider>, repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { auth, repos }
    }

    /// Load the session for `access_token` and, when present, its profile.
    ///
    /// Session lookup failures propagate. A missing or unreadable profile
    /// resolves to "no profile" so the gate can keep the user waiting.
    pub async fn resolve(&self, access_token: Option<&str>) -> DomainResult<Resolved> {
        let session = match access_token {
            Some(token) => self.auth.get_session(token).await?,
            None => None,
        };
        let Some(session) = session else {
            return Ok(Resolved {
                session: None,
                snapshot: SessionSnapshot::signed_out(),
            });
        };

        let user_id = session.identity.id.as_str();
        let profile = match self.repos.profiles().find_by_id(user_id).await {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                warn!(user_id, "Authenticated identity has no profile");
                None
            }
            Err(e) => {
                warn!(user_id, error = %e, "Profile fetch failed");
                None
            }
        };

        Ok(Resolved {
            snapshot: SessionSnapshot {
                identity: Some(session.identity.clone()),
                profile,
                resolving: false,
            },
            session: Some(session),
        })
    }
}
