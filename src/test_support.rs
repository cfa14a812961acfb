//! Shared fixtures for service and HTTP tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use sea_orm::DatabaseConnection;

use crate::application::events::{create_event_bus, SharedEventBus};
use crate::application::ports::{AuthProvider, IssuedSession, SignUpMetadata};
use crate::application::{CompanyService, InviteService, SessionResolver, TimeClockService};
use crate::config::CorsSection;
use crate::domain::company::{Company, CompanyCode};
use crate::domain::identity::Identity;
use crate::domain::profile::Role;
use crate::domain::session::Actor;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::testing::test_db;
use crate::infrastructure::{LocalAuthProvider, LogMailer};
use crate::interfaces::http::{create_router, AppState};
use crate::shared::store_now;

pub(crate) const PASSWORD: &str = "password1";
/// Lowest cost bcrypt accepts; keeps hashing fast in tests.
pub(crate) const TEST_BCRYPT_COST: u32 = 4;

pub(crate) struct TestApp {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub events: SharedEventBus,
    pub jwt_config: JwtConfig,
    pub auth: Arc<dyn AuthProvider>,
    pub resolver: Arc<SessionResolver>,
    pub companies: Arc<CompanyService>,
    pub timeclock: Arc<TimeClockService>,
    pub invites: Arc<InviteService>,
}

pub(crate) fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".into(),
        expiration_hours: 1,
        issuer: "timeclock-test".into(),
    }
}

pub(crate) async fn test_app() -> TestApp {
    let db = test_db().await;
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let events = create_event_bus();
    let jwt_config = test_jwt_config();
    let auth: Arc<dyn AuthProvider> = Arc::new(
        LocalAuthProvider::new(
            repos.clone(),
            jwt_config.clone(),
            Arc::new(LogMailer),
            events.clone(),
        )
        .with_bcrypt_cost(TEST_BCRYPT_COST),
    );
    TestApp {
        resolver: Arc::new(SessionResolver::new(auth.clone(), repos.clone())),
        companies: Arc::new(CompanyService::new(repos.clone(), events.clone())),
        timeclock: Arc::new(TimeClockService::new(repos.clone(), Duration::from_secs(1))),
        invites: Arc::new(InviteService::new(auth.clone())),
        db,
        repos,
        events,
        jwt_config,
        auth,
    }
}

impl TestApp {
    pub fn state(&self) -> AppState {
        AppState {
            db: self.db.clone(),
            auth: self.auth.clone(),
            resolver: self.resolver.clone(),
            companies: self.companies.clone(),
            timeclock: self.timeclock.clone(),
            invites: self.invites.clone(),
            started_at: Arc::new(Instant::now()),
        }
    }

    /// Full router with a private (not globally installed) metrics recorder.
    pub fn router(&self) -> Router {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_router(self.state(), handle, &CorsSection::default())
    }

    pub async fn sign_up(&self, email: &str, role: Role) -> Identity {
        let name = email.split('@').next().unwrap_or(email).to_string();
        self.auth
            .sign_up(email, PASSWORD, SignUpMetadata::new(name, role))
            .await
            .expect("sign up")
    }

    pub async fn sign_in(&self, email: &str) -> IssuedSession {
        self.auth
            .sign_in_with_password(email, PASSWORD)
            .await
            .expect("sign in")
    }

    pub async fn actor_for(&self, identity: &Identity) -> Actor {
        let profile = self
            .repos
            .profiles()
            .find_by_id(&identity.id)
            .await
            .expect("profile lookup")
            .expect("profile exists");
        Actor {
            identity: identity.clone(),
            profile,
        }
    }

    /// Company with a fixed join code, owned by a fresh admin.
    pub async fn seed_company_with_code(&self, code: &str) -> Company {
        let owner = self
            .sign_up(&format!("owner-{}@example.com", code), Role::Admin)
            .await;
        self.repos
            .companies()
            .create_with_owner(Company {
                id: format!("company-{}", code),
                owner_id: owner.id,
                name: "Seeded".into(),
                code: CompanyCode::parse(code).expect("valid code"),
                created_at: store_now(),
            })
            .await
            .expect("seed company")
    }

    /// Admin who already created "Acme".
    pub async fn owner_with_company(&self, email: &str) -> (Actor, Company) {
        let identity = self.sign_up(email, Role::Admin).await;
        let actor = self.actor_for(&identity).await;
        let company = self
            .companies
            .create_company(&actor, "Acme")
            .await
            .expect("create company");
        (self.actor_for(&identity).await, company)
    }

    /// Employee who joined `company` with its code.
    pub async fn employee_in(&self, company: &Company, email: &str) -> Actor {
        let identity = self.sign_up(email, Role::Employee).await;
        let actor = self.actor_for(&identity).await;
        self.companies
            .join_company(&actor, company.code.as_str())
            .await
            .expect("join company");
        self.actor_for(&identity).await
    }
}
