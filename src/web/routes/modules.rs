use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    learning::{self, document},
    model::{
        CrudRepository, ResourceType, ResourceTyped,
        entity::{LearningModule, ModuleCreate, UserProgress},
    },
    provider::{HistoryEntry, ModuleBrief},
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            modules::{DeleteResponse, GenerateModuleBody, ListQuery},
            quiz::{QuizResult, QuizSubmission},
        },
        error::ErrorResponse,
        extract::{ValidJson, ValidPath, ValidQuery},
        middlewares,
        routes::owned_module,
    },
};

/// Earlier modules handed to the provider as learning history.
const HISTORY_LIMIT: i64 = 10;

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/api/v1/modules", get(modules_list_handler))
        .route("/api/v1/modules/generate", post(modules_generate_handler))
        .route(
            "/api/v1/modules/{id}",
            get(modules_get_handler).delete(modules_delete_handler),
        )
        .route("/api/v1/modules/{id}/quiz/submit", post(quiz_submit_handler))
        .route("/api/v1/modules/{id}/pdf", get(modules_pdf_handler))
        .route("/api/v1/modules/{id}/assignment", get(modules_assignment_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::require_user_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/modules/generate",
    description = "Generates a learning module with the content provider and stores it",
    request_body = GenerateModuleBody,
    responses(
        (status = 201, description = "Module generated", body = LearningModule),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 502, description = "Content provider failed", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules",
    security(("bearer" = []))
)]
#[tracing::instrument(skip_all)]
async fn modules_generate_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<GenerateModuleBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let history = UserProgress::by_module(state.pool(), user, HISTORY_LIMIT)
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::UserProgress, e))?
        .into_iter()
        .map(|row| HistoryEntry {
            title: row.title,
            score: row.quiz_score,
        })
        .collect();

    let brief = ModuleBrief {
        prompt: payload.prompt.trim().to_string(),
        difficulty: payload.difficulty.unwrap_or_default(),
        duration_minutes: payload.duration_minutes(),
        background: payload.background(),
        history,
    };

    tracing::info!(
        provider = state.provider().name(),
        difficulty = %brief.difficulty,
        "generating module"
    );
    let generated = state
        .provider()
        .generate_module(&brief)
        .await
        .map_err(WebError::provider_error)?;

    let created = LearningModule::create(
        state.pool(),
        user,
        ModuleCreate {
            difficulty: brief.difficulty,
            duration_minutes: brief.duration_minutes,
            generated,
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(LearningModule::get_resource_type(), e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules",
    description = "Lists the caller's modules, newest first",
    params(ListQuery),
    responses(
        (status = 200, description = "Successfully collected modules", body = Vec<LearningModule>),
        (status = 400, description = "Malformed query string", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse),
    ),
    tag = "modules",
    security(("bearer" = []))
)]
async fn modules_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let modules = LearningModule::list(state.pool(), user, query.limit(), query.offset())
        .await
        .map_err(|e| WebError::resource_fetch_error(LearningModule::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(modules)))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{id}",
    params(("id" = Uuid, Path, description = "Module id")),
    responses(
        (status = 200, description = "Module found", body = LearningModule),
        (status = 400, description = "Malformed module id", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 403, description = "Module belongs to another user", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
    ),
    tag = "modules",
    security(("bearer" = []))
)]
async fn modules_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let module = owned_module(&state, user, id).await?;

    Ok((StatusCode::OK, Json(module)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/modules/{id}",
    description = "Deletes a module together with its progress",
    params(("id" = Uuid, Path, description = "Module id")),
    responses(
        (status = 200, description = "Module deleted", body = DeleteResponse),
        (status = 400, description = "Malformed module id", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 403, description = "Module belongs to another user", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
    ),
    tag = "modules",
    security(("bearer" = []))
)]
async fn modules_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let module = owned_module(&state, user, id).await?;

    module
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(LearningModule::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(DeleteResponse {
            success: true,
            message: String::from("Module deleted successfully"),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/modules/{id}/quiz/submit",
    description = "Grades quiz answers against the module's stored questions",
    params(("id" = Uuid, Path, description = "Module id")),
    request_body = QuizSubmission,
    responses(
        (status = 200, description = "Quiz graded", body = QuizResult),
        (status = 400, description = "Malformed answers or module without quiz", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 403, description = "Module belongs to another user", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
    ),
    tag = "quiz",
    security(("bearer" = []))
)]
#[tracing::instrument(skip_all)]
async fn quiz_submit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(submission): ValidJson<QuizSubmission>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let module = owned_module(&state, user, id).await?;

    let outcome = learning::grade(module.quiz_questions(), &submission.answers)
        .map_err(WebError::quiz_grading_error)?;

    UserProgress::record_quiz(state.pool(), user, module.id(), outcome.score)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserProgress::get_resource_type(), e))?;

    tracing::info!(module_id = %module.id(), score = outcome.score, "quiz graded");
    Ok((StatusCode::OK, Json(QuizResult::new(module.id(), outcome))))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{id}/pdf",
    description = "Renders the module notes as a PDF",
    params(("id" = Uuid, Path, description = "Module id")),
    responses(
        (status = 200, description = "Notes as application/pdf"),
        (status = 400, description = "Malformed module id", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 403, description = "Module belongs to another user", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
    ),
    tag = "modules",
    security(("bearer" = []))
)]
async fn modules_pdf_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let module = owned_module(&state, user, id).await?;

    let pdf = document::render_notes_pdf(
        module.title(),
        module.description(),
        module.content(),
        module.prerequisites(),
    )
    .map_err(WebError::server_render_error)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, String::from("application/pdf")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}_notes.pdf\"", module.slug()),
            ),
        ],
        pdf,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{id}/assignment",
    description = "Downloads the module's assignment as LaTeX source",
    params(("id" = Uuid, Path, description = "Module id")),
    responses(
        (status = 200, description = "LaTeX source as a .tex attachment"),
        (status = 400, description = "Malformed module id", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 403, description = "Module belongs to another user", body = ErrorResponse),
        (status = 404, description = "Module or assignment not found", body = ErrorResponse),
    ),
    tag = "assignments",
    security(("bearer" = []))
)]
async fn modules_assignment_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let module = owned_module(&state, user, id).await?;
    let latex = module
        .assignment_latex()
        .ok_or_else(|| WebError::resource_not_found(ResourceType::Assignment))?
        .to_string();

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, String::from("application/x-tex; charset=utf-8")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}_assignment.tex\"", module.slug()),
            ),
        ],
        latex,
    ))
}
