//! Backend entry-point: loads settings, prepares storage, and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::AppSettings;
use backend::inbound::http::health::HealthState;
use backend::outbound::auth::JwtTokenVerifier;
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let mut config =
        ServerConfig::new(settings.bind_addr()?).with_cors_origins(settings.cors_origins());

    match settings.database_url()? {
        Some(url) => {
            if settings.run_migrations() {
                run_migrations(url)
                    .await
                    .wrap_err("database migration failed")?;
            }
            let pool_config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("database pool setup failed")?;
            info!(max_size = settings.db_max_connections(), "database pool ready");
            config = config.with_db_pool(pool);
        }
        None => warn!("no database_url configured; fixture mode serves an in-memory store"),
    }

    match settings.jwt_settings() {
        Some(jwt) => {
            let verifier = JwtTokenVerifier::new(jwt).wrap_err("invalid bearer token key")?;
            config = config.with_token_verifier(Arc::new(verifier));
        }
        None => warn!("no bearer token key configured; /me answers 503"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await.wrap_err("server terminated with an error")
}
