//! VoteCerto entry-point: loads configuration, chooses the store and serves
//! the REST API.

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use votecerto::inbound::http::health::HealthState;
use votecerto::inbound::http::session_config::{BuildMode, session_settings_from_env};
use votecerto::outbound::Repositories;
use votecerto::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use votecerto::server::{ServerConfig, ServerSettings, ServiceDeps, build_http_state, create_server};

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

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("load configuration: {e}")))?;
    let bind_addr = settings.bind_addr()?;

    let repos = match settings.database_url.clone() {
        Some(url) => postgres_repositories(url, settings.pool_max_size()).await?,
        None => {
            warn!("VOTECERTO_DATABASE_URL not set; data lives in memory until shutdown");
            Repositories::in_memory()
        }
    };

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(format!("session configuration: {e}")))?;
    let config = ServerConfig::new(session, bind_addr)
        .with_session_ttl_hours(settings.session_ttl_hours());

    let http_state = build_http_state(&repos, &ServiceDeps::default());
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}

async fn postgres_repositories(url: String, max_size: u32) -> std::io::Result<Repositories> {
    let migration_url = url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task: {e}")))?
        .map_err(|e| std::io::Error::other(format!("run migrations: {e}")))?;

    let config = PoolConfig::new(&url)
        .with_max_size(max_size)
        .with_min_idle(Some(max_size.min(2)));
    let pool = DbPool::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("create database pool: {e}")))?;
    Ok(Repositories::postgres(&pool))
}
