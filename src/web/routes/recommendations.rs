use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::{
    learning,
    model::{ResourceTyped, entity::LearningModule},
    provider::videos,
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::recommendations::{NextTopicsResponse, VideoRecommendations},
        error::ErrorResponse,
        extract::ValidPath,
        middlewares,
    },
};

const MAX_TOPIC_LEN: usize = 200;

pub fn routes<S>(state: AppState) -> Router<S> {
    let personal = Router::new()
        .route("/api/v1/recommendations/next-topics", get(next_topics_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::require_user_fn,
        ));

    Router::new()
        .route("/api/v1/videos/recommend/{topic}", get(videos_handler))
        .merge(personal)
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/videos/recommend/{topic}",
    description = "Recommends up to five videos for a topic",
    params(("topic" = String, Path, description = "Anything the learner wants to study")),
    responses(
        (status = 200, description = "Video recommendations", body = VideoRecommendations),
        (status = 400, description = "Blank or oversized topic", body = ErrorResponse),
    ),
    tag = "recommendations"
)]
async fn videos_handler(ValidPath(topic): ValidPath<String>) -> WebResult<impl IntoResponse> {
    let topic = topic.trim();
    if topic.is_empty() || topic.chars().count() > MAX_TOPIC_LEN {
        return Err(WebError::invalid_path(format!(
            "topic must be 1 to {MAX_TOPIC_LEN} characters"
        )));
    }

    let videos = videos::recommend(topic, topic, videos::MAX_VIDEOS);
    Ok((
        StatusCode::OK,
        Json(VideoRecommendations::new(topic.to_string(), videos)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/recommendations/next-topics",
    description = "Suggests topics to study next, based on the caller's modules",
    responses(
        (status = 200, description = "Topic suggestions", body = NextTopicsResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
    ),
    tag = "recommendations",
    security(("bearer" = []))
)]
async fn next_topics_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let titles = LearningModule::titles(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(LearningModule::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(NextTopicsResponse {
            recommendations: learning::next_topics(&titles),
        }),
    ))
}
