//! salah-api - Masjid directory and prayer schedule service
//!
//! Serves the geographic directory (state, city, masjid), per-date prayer
//! timings with default-schedule and latest-record fallbacks, additional
//! daily timings and special events over HTTP.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use salah_api::{build_router, AppState};
use salah_common::config::ServiceConfig;

#[derive(Debug, Parser)]
#[command(name = "salah-api", about = "Masjid directory and prayer schedule service")]
struct Args {
    /// Listen address (overrides SALAH_API_HOST and the config file)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides SALAH_API_PORT and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database file (overrides SALAH_API_DATABASE and the config file)
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber before anything else
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting salah-api v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = ServiceConfig::resolve(args.host, args.port, args.database);
    info!("Database path: {}", config.database.display());

    let pool = match salah_common::db::connect(&config.database).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("salah-api listening on http://{}:{}", config.host, config.port);
    info!("Health check: http://{}:{}/health", config.host, config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
