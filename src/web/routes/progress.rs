use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::{
    model::{
        CrudRepository, ResourceTyped,
        entity::{LearningModule, UserEntity, UserProgress},
    },
    web::{
        AppState, RequestContext, WebError, WebResult, dto::progress::ProgressSummary,
        error::ErrorResponse, middlewares,
    },
};

/// Modules listed in the progress summary.
const RECENT_MODULES_LIMIT: i64 = 50;

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/api/v1/progress", get(progress_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::require_user_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/progress",
    description = "Summarizes the caller's modules and quiz results",
    responses(
        (status = 200, description = "Progress summary", body = ProgressSummary),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "progress",
    security(("bearer" = []))
)]
async fn progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let progress_error = |e| WebError::resource_fetch_error(UserProgress::get_resource_type(), e);

    let account = UserEntity::find_by_id(state.pool(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(WebError::auth_user_revoked)?;

    let total_modules = LearningModule::count(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(LearningModule::get_resource_type(), e))?;
    let stats = UserProgress::stats(state.pool(), user)
        .await
        .map_err(progress_error)?;
    let modules = UserProgress::by_module(state.pool(), user, RECENT_MODULES_LIMIT)
        .await
        .map_err(progress_error)?;

    Ok((
        StatusCode::OK,
        Json(ProgressSummary {
            email: account.email().to_string(),
            total_modules,
            quizzes_taken: stats.quizzes_taken,
            average_score: stats.average_score,
            best_score: stats.best_score,
            modules,
        }),
    ))
}
