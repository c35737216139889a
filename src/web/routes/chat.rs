use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::post,
};
use uuid::Uuid;

use crate::{
    model::{CrudRepository, ResourceTyped, entity::LearningModule},
    provider::{ChatBrief, ChatReply, ModuleContext},
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult, dto::chat::ChatBody,
        error::ErrorResponse, extract::ValidJson, middlewares,
    },
};

/// Module titles sent along as learning context.
const KNOWN_MODULES_LIMIT: i64 = 10;

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/api/v1/chat", post(chat_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::require_user_fn,
        ))
        .with_state(state)
}

/// The module named by `current_module`, if it parses and is the caller's own.
async fn current_module(
    state: &AppState,
    user: &AuthenticatedUser,
    current_module: Option<&str>,
) -> WebResult<Option<ModuleContext>> {
    let Some(id) = current_module.and_then(|raw| raw.trim().parse::<Uuid>().ok()) else {
        return Ok(None);
    };

    let module = LearningModule::find_by_id(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(LearningModule::get_resource_type(), e))?;

    Ok(module
        .filter(|m| m.user_id() == user.user_id())
        .map(|m| ModuleContext {
            title: m.title().to_string(),
            description: m.description().to_string(),
        }))
}

#[utoipa::path(
    post,
    path = "/api/v1/chat",
    description = "Answers a learner's message, using their modules as context",
    request_body = ChatBody,
    responses(
        (status = 200, description = "Assistant reply", body = ChatReply),
        (status = 400, description = "Blank or oversized message", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 502, description = "Content provider failed", body = ErrorResponse),
    ),
    tag = "chat",
    security(("bearer" = []))
)]
#[tracing::instrument(skip_all)]
async fn chat_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ChatBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let current_module = current_module(&state, user, payload.current_module.as_deref()).await?;
    let known_modules = LearningModule::list(state.pool(), user, KNOWN_MODULES_LIMIT, 0)
        .await
        .map_err(|e| WebError::resource_fetch_error(LearningModule::get_resource_type(), e))?
        .iter()
        .map(|m| m.title().to_string())
        .collect();

    let brief = ChatBrief {
        message: payload.message.trim().to_string(),
        current_module,
        known_modules,
    };

    let reply = state
        .provider()
        .chat(&brief)
        .await
        .map_err(WebError::provider_error)?;

    Ok((StatusCode::OK, Json(reply)))
}
