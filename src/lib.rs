use std::sync::Arc;

use crate::model::{DbConnection, ModelManager};
use crate::provider::ContentProvider;
use crate::utils::signal::shutdown_signal;
use crate::web::AuthSettings;
use crate::{error::AppResult, web::AppState};
use axum::Router;
use tokio::net::TcpListener;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod auth;
pub mod error;
pub mod learning;
pub mod model;
pub mod provider;
pub mod utils;
pub mod web;

pub static APPLICATION_NAME: &str = "gyanforge";

pub async fn build_server() -> AppResult<(AppState, Router)> {
    let config = config::Config::get_or_init(cfg!(debug_assertions)).await;
    let db = DbConnection::connect(config.app().database_uri())?;

    tracing::debug!("applying migrations...");
    db.migrate().await?;

    let provider = provider::from_config(config.provider())?;
    build_server_with(db, provider).await
}

/// Server over an existing pool, with the provider named in the config.
pub async fn build_server_with_pool(db: DbConnection) -> AppResult<(AppState, Router)> {
    let config = config::Config::get_or_init(true).await;
    let provider = provider::from_config(config.provider())?;
    build_server_with(db, provider).await
}

pub async fn build_server_with(
    db: DbConnection,
    provider: Arc<dyn ContentProvider>,
) -> AppResult<(AppState, Router)> {
    let config = config::Config::get_or_init(true).await;
    tracing::info!(provider = provider.name(), "content provider ready");

    let auth = AuthSettings::new(config.app().jwt(), config.app().token_ttl_minutes());
    let state = AppState::new(ModelManager::new(db), provider, auth);
    let app = web::routes::build_app(state.clone(), config);
    Ok((state, app))
}

#[tracing::instrument]
pub async fn setup_workers() -> AppResult<()> {
    let (_, app) = build_server().await?;
    let config = Config::get_or_init(false).await;
    let listener = TcpListener::bind(config.host().bindto()).await?;

    tracing::info!("{APPLICATION_NAME} is starting at: {}", config.host().bindto());
    let axum_handle = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal());

    axum_handle.await?;
    Ok(())
}

fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

#[tracing::instrument]
pub async fn run() -> AppResult<()> {
    setup_trace();
    setup_workers().await?;
    Ok(())
}
