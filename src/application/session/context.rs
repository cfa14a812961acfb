//! Per-client session context
//!
//! Holds the current access token and publishes the resolved snapshot on a
//! watch channel. Created explicitly, started with [`SessionContext::init`]
//! and torn down through the returned [`SessionSubscription`].

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::resolver::SessionResolver;
use crate::application::ports::{AuthProvider, IssuedSession};
use crate::domain::session::{Route, SessionSnapshot};
use crate::domain::DomainResult;

#[derive(Default)]
struct Credentials {
    access_token: Option<String>,
    session_id: Option<String>,
    user_id: Option<String>,
    /// Bumped whenever the token is adopted or cleared. A resolution
    /// started under an older generation is discarded.
    generation: u64,
}

pub struct SessionContext {
    auth: Arc<dyn AuthProvider>,
    resolver: Arc<SessionResolver>,
    credentials: RwLock<Credentials>,
    state: watch::Sender<SessionSnapshot>,
}

impl SessionContext {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        resolver: Arc<SessionResolver>,
        access_token: Option<String>,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(SessionSnapshot::resolving());
        Arc::new(Self {
            auth,
            resolver,
            credentials: RwLock::new(Credentials {
                access_token,
                ..Default::default()
            }),
            state,
        })
    }

    /// Subscribe to auth state changes, run the initial resolution and keep
    /// re-resolving on every event that concerns this session's user.
    pub async fn init(self: &Arc<Self>) -> SessionSubscription {
        // Subscribe before resolving so no event between the two is lost
        let mut events = self.auth.on_auth_state_change();
        self.reresolve().await;

        let ctx = Arc::clone(self);
        let handle = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let relevant = {
                    let creds = ctx.credentials.read().await;
                    event
                        .concerns(creds.user_id.as_deref(), creds.session_id.as_deref())
                        .then_some(creds.generation)
                };
                if let Some(generation) = relevant {
                    debug!(event = event.event_type(), user_id = %event.user_id, "Re-resolving session");
                    ctx.resolve_generation(generation).await;
                }
            }
        });
        SessionSubscription {
            handle: Some(handle),
        }
    }

    /// Resolve again from the stored token and publish the result.
    ///
    /// While the resolution runs the snapshot is marked `resolving`. A
    /// failing session store leaves it that way.
    pub async fn reresolve(&self) {
        let generation = self.credentials.read().await.generation;
        self.resolve_generation(generation).await;
    }

    /// Resolve only if the credentials are still at `generation`, and
    /// publish only if they did not change while resolving.
    async fn resolve_generation(&self, generation: u64) {
        let token = {
            let creds = self.credentials.read().await;
            if creds.generation != generation {
                debug!("Skipping resolution for replaced credentials");
                return;
            }
            self.state.send_modify(|s| s.resolving = true);
            creds.access_token.clone()
        };
        let resolved = self.resolver.resolve(token.as_deref()).await;

        let mut creds = self.credentials.write().await;
        if creds.generation != generation {
            debug!("Discarding resolution for replaced credentials");
            return;
        }
        match resolved {
            Ok(resolved) => {
                creds.session_id = resolved.session_id().map(str::to_string);
                creds.user_id = resolved.snapshot.identity.as_ref().map(|i| i.id.clone());
                self.state.send_replace(resolved.snapshot);
            }
            Err(e) => warn!(error = %e, "Session resolution failed"),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> DomainResult<IssuedSession> {
        let issued = self.auth.sign_in_with_password(email, password).await?;
        self.adopt(&issued).await;
        self.reresolve().await;
        Ok(issued)
    }

    pub async fn refresh(&self) -> DomainResult<Option<IssuedSession>> {
        let Some(token) = self.access_token().await else {
            return Ok(None);
        };
        let issued = self.auth.refresh_session(&token).await?;
        self.adopt(&issued).await;
        self.reresolve().await;
        Ok(Some(issued))
    }

    /// Invalidate the session with the provider and clear local state.
    pub async fn sign_out(&self) -> DomainResult<()> {
        let token = {
            let mut creds = self.credentials.write().await;
            let token = creds.access_token.take();
            creds.session_id = None;
            creds.user_id = None;
            creds.generation += 1;
            self.state.send_replace(SessionSnapshot::signed_out());
            token
        };
        if let Some(token) = token {
            self.auth.sign_out(&token).await?;
        }
        Ok(())
    }

    pub async fn access_token(&self) -> Option<String> {
        self.credentials.read().await.access_token.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn route(&self) -> Route {
        self.state.borrow().route()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    async fn adopt(&self, issued: &IssuedSession) {
        let mut creds = self.credentials.write().await;
        creds.access_token = Some(issued.access_token.clone());
        creds.session_id = Some(issued.session_id.clone());
        creds.user_id = Some(issued.identity.id.clone());
        creds.generation += 1;
    }
}

/// Handle for the background listener started by `init`.
/// Dropping it stops the listener.
pub struct SessionSubscription {
    handle: Option<JoinHandle<()>>,
}

impl SessionSubscription {
    pub fn unsubscribe(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::profile::Role;
    use crate::test_support::{test_app, PASSWORD};

    async fn wait_for_route(rx: &mut watch::Receiver<SessionSnapshot>, route: Route) {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if rx.borrow_and_update().route() == route {
                    return;
                }
                rx.changed().await.expect("context alive");
            }
        })
        .await
        .unwrap_or_else(|_| panic!("route {} not reached", route));
    }

    #[tokio::test]
    async fn starts_resolving_then_signed_out_without_token() {
        let app = test_app().await;
        let ctx = SessionContext::new(app.auth.clone(), app.resolver.clone(), None);
        assert_eq!(ctx.route(), Route::Wait);

        let _sub = ctx.init().await;
        assert_eq!(ctx.route(), Route::SignIn);
        assert!(!ctx.snapshot().resolving);
    }

    #[tokio::test]
    async fn sign_in_resolves_profile_and_route() {
        let app = test_app().await;
        app.sign_up("boss@example.com", Role::Admin).await;
        let ctx = SessionContext::new(app.auth.clone(), app.resolver.clone(), None);
        let _sub = ctx.init().await;

        ctx.sign_in("boss@example.com", PASSWORD).await.unwrap();
        let snap = ctx.snapshot();
        assert_eq!(snap.identity.unwrap().email, "boss@example.com");
        assert_eq!(snap.profile.unwrap().role, Role::Admin);
        assert_eq!(ctx.route(), Route::CreateCompany);
    }

    #[tokio::test]
    async fn profile_update_event_moves_the_route() {
        let app = test_app().await;
        let owner = app.sign_up("boss@example.com", Role::Admin).await;
        let owner_actor = app.actor_for(&owner).await;
        let company = app
            .companies
            .create_company(&owner_actor, "Acme")
            .await
            .unwrap();

        app.sign_up("worker@example.com", Role::Employee).await;
        let ctx = SessionContext::new(app.auth.clone(), app.resolver.clone(), None);
        let _sub = ctx.init().await;
        ctx.sign_in("worker@example.com", PASSWORD).await.unwrap();
        assert_eq!(ctx.route(), Route::JoinCompany);

        let mut rx = ctx.subscribe();
        let worker = app.actor_for(&ctx.snapshot().identity.unwrap()).await;
        app.companies
            .join_company(&worker, company.code.as_str())
            .await
            .unwrap();
        wait_for_route(&mut rx, Route::EmployeeDashboard).await;
    }

    #[tokio::test]
    async fn sign_out_clears_state_and_stops_on_unsubscribe() {
        let app = test_app().await;
        app.sign_up("worker@example.com", Role::Employee).await;
        let ctx = SessionContext::new(app.auth.clone(), app.resolver.clone(), None);
        let sub = ctx.init().await;
        let issued = ctx.sign_in("worker@example.com", PASSWORD).await.unwrap();

        ctx.sign_out().await.unwrap();
        assert_eq!(ctx.route(), Route::SignIn);
        assert!(ctx.access_token().await.is_none());
        assert!(app.auth.get_session(&issued.access_token).await.unwrap().is_none());

        let before = app.events.subscriber_count();
        sub.unsubscribe();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(app.events.subscriber_count(), before - 1);
    }

    #[tokio::test]
    async fn sign_out_is_not_undone_by_a_pending_resolution() {
        let app = test_app().await;
        app.sign_up("worker@example.com", Role::Employee).await;
        for _ in 0..5 {
            let ctx = SessionContext::new(app.auth.clone(), app.resolver.clone(), None);
            let _sub = ctx.init().await;
            ctx.sign_in("worker@example.com", PASSWORD).await.unwrap();

            let mut rx = ctx.subscribe();
            ctx.sign_out().await.unwrap();
            rx.borrow_and_update();

            let mut observed = Vec::new();
            let _ = tokio::time::timeout(Duration::from_millis(100), async {
                while rx.changed().await.is_ok() {
                    observed.push(rx.borrow_and_update().route());
                }
            })
            .await;
            assert!(
                observed.iter().all(|route| *route == Route::SignIn),
                "routes after sign-out: {:?}",
                observed
            );
            assert_eq!(ctx.route(), Route::SignIn);
        }
    }

    #[tokio::test]
    async fn sign_out_elsewhere_is_observed() {
        let app = test_app().await;
        app.sign_up("worker@example.com", Role::Employee).await;
        let issued = app.sign_in("worker@example.com").await;

        let ctx = SessionContext::new(
            app.auth.clone(),
            app.resolver.clone(),
            Some(issued.access_token.clone()),
        );
        let _sub = ctx.init().await;
        assert_eq!(ctx.route(), Route::JoinCompany);

        let mut rx = ctx.subscribe();
        app.auth.sign_out(&issued.access_token).await.unwrap();
        wait_for_route(&mut rx, Route::SignIn).await;
    }

    #[tokio::test]
    async fn identity_without_profile_waits() {
        use crate::infrastructure::database::entities::profile;
        use sea_orm::EntityTrait;

        let app = test_app().await;
        let identity = app.sign_up("ghost@example.com", Role::Employee).await;
        let issued = app.sign_in("ghost@example.com").await;
        profile::Entity::delete_by_id(identity.id.clone())
            .exec(&app.db)
            .await
            .unwrap();

        let ctx = SessionContext::new(
            app.auth.clone(),
            app.resolver.clone(),
            Some(issued.access_token),
        );
        let _sub = ctx.init().await;
        let snap = ctx.snapshot();
        assert!(snap.identity.is_some());
        assert!(snap.profile.is_none());
        assert_eq!(ctx.route(), Route::Wait);
    }
}
