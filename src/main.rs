//! Time clock service binary
//!
//! ```sh
//! # Run with default config (~/.config/timeclock/config.toml)
//! timeclock-service
//!
//! # Custom config path and port
//! timeclock-service --config /etc/timeclock/config.toml --port 9000
//!
//! # Validate config without starting
//! timeclock-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use timeclock::config::{resolve_config_path, AppConfig};
use timeclock::server::{init_tracing, ServerHandle, ServerOptions};

/// Multi-tenant time clock: companies, employees and clock-in/clock-out.
#[derive(Parser, Debug)]
#[command(
    name = "timeclock-service",
    version,
    about = "Multi-tenant time clock service",
    long_about = "REST API for companies, employees and clock-in/clock-out \
                  with geolocation.\n\n\
                  Default config: ~/.config/timeclock/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "TIMECLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("{}", e);
            error!("Using default configuration.");
        }
    }

    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;

    Ok(())
}
