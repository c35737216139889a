use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::{
    Config,
    model::{CrudRepository, ResourceTyped, check_access, entity::LearningModule},
    web::{AppState, AuthenticatedUser, WebError, WebResult, doc::ApiDoc},
};

pub mod assignments;
pub mod auth;
pub mod chat;
pub mod health;
pub mod modules;
pub mod progress;
pub mod recommendations;
pub mod users;

pub fn build_app<S: Send + Sync + Clone + 'static>(state: AppState, config: &'static Config) -> Router<S> {
    let mut router = Router::new()
        .merge(auth::routes(state.clone()))
        .merge(users::routes(state.clone()))
        .merge(modules::routes(state.clone()))
        .merge(assignments::routes(state.clone()))
        .merge(chat::routes(state.clone()))
        .merge(progress::routes(state.clone()))
        .merge(recommendations::routes(state.clone()))
        .merge(health::routes(state.clone()));

    if config.app().docs() {
        router = router
            .merge(SwaggerUi::new("/api/v1/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));
    }

    router
        .layer(cors_layer(config.app().cors_origins()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Permissive when no origins (or `*`) are configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin `{o}`");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

/// Loads module `id` for `user`: 404 when missing, 403 when someone else owns it.
pub(crate) async fn owned_module(
    state: &AppState,
    user: &AuthenticatedUser,
    id: Uuid,
) -> WebResult<LearningModule> {
    let module = LearningModule::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(LearningModule::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(LearningModule::get_resource_type()))?;

    check_access(state.pool(), user, &module)
        .await
        .map_err(|e| WebError::resource_access_error(LearningModule::get_resource_type(), e))?;

    Ok(module)
}
