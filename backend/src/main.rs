//! Backend entry-point: loads settings, opens the store and serves the REST
//! API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use visa_backend::inbound::http::health::HealthState;
use visa_backend::inbound::http::session_config::{
    BuildMode, ProcessEnv, session_settings_from_env,
};
use visa_backend::outbound::persistence::{DbPool, run_pending_migrations};

fn other(err: impl std::fmt::Display) -> io::Error {
    io::Error::other(err.to_string())
}

async fn build_config(settings: &ServerSettings) -> io::Result<ServerConfig> {
    let mode = BuildMode::from_debug_assertions();
    let session = session_settings_from_env(&ProcessEnv, mode).map_err(other)?;
    let identity = settings.identity_settings(mode).map_err(other)?;
    let mut config = ServerConfig::new(session, settings.bind_addr().map_err(other)?)
        .with_build_mode(mode)
        .with_empty_result_policy(settings.empty_result_policy().map_err(other)?);

    if let Some(pool_config) = settings.pool_config() {
        run_pending_migrations(pool_config.database_url())
            .await
            .map_err(other)?;
        let pool = DbPool::new(pool_config).await.map_err(other)?;
        config = config.with_db_pool(pool);
    }

    if let Some(identity) = identity {
        config = config.with_identity(identity);
    }
    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os()).map_err(other)?;
    let config = build_config(&settings).await?;
    info!(bind_addr = %config.bind_addr, "starting visa backend");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_draining();
    result
}
