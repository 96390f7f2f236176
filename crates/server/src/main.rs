mod app_state;
mod config;
mod db;
mod errors;
mod handlers;
mod logging;
mod models;
mod repo;
mod schema;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anicards_core::anilist::AniListClient;
use anicards_core::infra::reqwest_http::ReqwestHttp;
use config::{AppMode, ConfigError, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    let config_path = std::env::var("SERVER_CONFIG_PATH")
        .unwrap_or_else(|_| "crates/server/res/config.toml".to_string());

    let config = ServerConfig::load(Path::new(&config_path)).await?;
    logging::init_tracing(&config)?;

    tracing::info!(mode = ?config.app.mode, "server mode configured");
    tracing::info!(host = %config.http.host, port = config.http.port, "server http bind");

    let http = ReqwestHttp::new(&config.anilist.user_agent, config.anilist_timeout())
        .map_err(|e| ConfigError::Invalid(format!("http client build failed: {e}")))?;
    let anilist = AniListClient::new(Arc::new(http), config.anilist_endpoint());
    tracing::info!(endpoint = anilist.endpoint(), "anilist client configured");

    let default_colors = config.default_colors()?;

    let state = db::connect_db(&config, Path::new(&config_path), anilist, default_colors).await?;
    schema::apply_server_schema(&config, &state, Path::new(&config_path)).await?;

    if config.app.mode == AppMode::Dev && config.dev.reset_on_start {
        db::reset_server_data(&config, &state).await?;
    }

    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .map_err(|e| ConfigError::Invalid(format!("invalid http bind: {e}")))?;

    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ConfigError::Invalid(format!("http server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
