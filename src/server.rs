//! Reusable time clock server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, database and
//! migrations, service wiring, the HTTP API and graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::ports::AuthProvider;
use crate::application::{
    create_event_bus, CompanyService, InviteService, SessionResolver, SharedEventBus,
    TimeClockService,
};
use crate::config::{AppConfig, LogFormat};
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::{init_database, LocalAuthProvider, LogMailer};
use crate::interfaces::http::{create_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// The global recorder can only be installed once per process; a restart
/// within the same process reuses it.
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("📊 Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Handle to a running time clock service.
///
/// # Examples
///
/// ```rust,no_run
/// use timeclock::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Shared event bus (auth state changes, membership changes).
    pub event_bus: SharedEventBus,
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the API is bound to.
    pub local_addr: std::net::SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting time clock service...");

        let prometheus = prometheus_handle()?;

        // ── Database ───────────────────────────────────────────
        let db_config = app_cfg.database.to_database_config();
        info!("Database: {}", db_config.url);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let event_bus = create_event_bus();

        let jwt_config = app_cfg.security.jwt_config();
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );
        let auth: Arc<dyn AuthProvider> = Arc::new(
            LocalAuthProvider::new(
                repos.clone(),
                jwt_config,
                Arc::new(LogMailer),
                event_bus.clone(),
            )
            .with_invite_ttl_hours(app_cfg.security.invite_expiration_hours),
        );

        let state = AppState {
            db: db.clone(),
            auth: auth.clone(),
            resolver: Arc::new(SessionResolver::new(auth.clone(), repos.clone())),
            companies: Arc::new(CompanyService::new(repos.clone(), event_bus.clone())),
            timeclock: Arc::new(TimeClockService::new(
                repos.clone(),
                app_cfg.timeclock.geolocation_timeout(),
            )),
            invites: Arc::new(
                InviteService::new(auth).with_public_url(app_cfg.security.public_url.clone()),
            ),
            started_at: Arc::new(Instant::now()),
        };

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        // ── HTTP API ───────────────────────────────────────────
        let router = create_router(state, prometheus, &app_cfg.cors);
        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 HTTP API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("HTTP API server error: {}", e);
            }
        });

        info!("🚀 Time clock service started");

        Ok(Self {
            event_bus,
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown without waiting for it.
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Block until shutdown is triggered, then drain the API and close the
    /// database within the configured timeout.
    pub async fn wait(self) {
        let Self {
            shutdown,
            api_task,
            db,
            ..
        } = self;

        let completed = shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("HTTP API stopped"),
                    Err(e) => error!("HTTP API task panicked: {}", e),
                }
                if let Err(e) = db.close().await {
                    warn!("Error closing database connection: {}", e);
                } else {
                    info!("✅ Database connection closed");
                }
            })
            .await;

        if !completed {
            warn!("Shutdown timed out, exiting anyway");
        }
        info!("👋 Time clock service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down time clock service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_and_shuts_down_on_in_memory_sqlite() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = Some("sqlite::memory:".into());
        config.database.max_connections = 1;

        let handle = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: true,
        })
        .await
        .unwrap();
        assert!(handle.is_running());
        assert_ne!(handle.local_addr.port(), 0);
        handle.shutdown().await;
    }
}
