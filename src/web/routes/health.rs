use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::Utc;

use crate::web::{
    AppState,
    dto::health::{DatabaseHealth, HealthResponse, LiveResponse, ReadyResponse, SystemInfo},
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/live", get(live_handler))
        .route("/health/ready", get(ready_handler))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    description = "Service, database and host status",
    responses(
        (status = 200, description = "Service status", body = HealthResponse),
    ),
    tag = "health"
)]
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let connection = match state.pool().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("database health check failed: {e}");
            false
        }
    };

    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpus: std::thread::available_parallelism().map_or(1, |n| n.get()),
        pid: std::process::id(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(HealthResponse {
        status: String::from(if connection { "healthy" } else { "degraded" }),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: String::from(if connection { "connected" } else { "disconnected" }),
            connection,
        },
        system,
        provider: state.provider().name().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Process is running", body = LiveResponse)),
    tag = "health"
)]
async fn live_handler() -> impl IntoResponse {
    Json(LiveResponse {
        status: String::from("alive"),
        timestamp: Utc::now(),
    })
}

#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Ready to serve traffic", body = ReadyResponse),
        (status = 503, description = "Database unreachable", body = ReadyResponse),
    ),
    tag = "health"
)]
async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.pool().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyResponse {
                status: String::from("ready"),
                reason: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("readiness check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    status: String::from("not_ready"),
                    reason: Some(String::from("database unavailable")),
                }),
            )
        }
    }
}
