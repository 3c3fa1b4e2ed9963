//! Service entry point: settings, tracing, store selection and the HTTP server.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use subscriptions_aggregator::inbound::http::health::HealthState;
use subscriptions_aggregator::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use subscriptions_aggregator::server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(format!("invalid bind address: {e}")))?;

    let mut config = ServerConfig::new(bind_addr);
    match settings.database_url() {
        Some(url) => {
            if settings.run_migrations() {
                run_pending_migrations(&url)
                    .await
                    .map_err(|e| std::io::Error::other(e.to_string()))?;
            }
            let pool_config = PoolConfig::new(url).with_max_size(settings.pool_max_size());
            let pool = DbPool::new(pool_config)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; falling back to the in-memory store"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "subscriptions aggregator listening");
    server.await
}
