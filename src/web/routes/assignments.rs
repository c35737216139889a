use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    learning::document,
    model::ResourceType,
    web::{
        AppState, RequestContext, WebError, WebResult, dto::modules::LatexResponse,
        error::ErrorResponse, extract::ValidPath, middlewares, routes::owned_module,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/api/v1/assignments/{id}/latex", get(assignment_latex_handler))
        .route("/api/v1/assignments/{id}/pdf", get(assignment_pdf_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::require_user_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments/{id}/latex",
    params(("id" = Uuid, Path, description = "Module id")),
    responses(
        (status = 200, description = "Assignment source", body = LatexResponse),
        (status = 400, description = "Malformed module id", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 403, description = "Module belongs to another user", body = ErrorResponse),
        (status = 404, description = "Module or assignment not found", body = ErrorResponse),
    ),
    tag = "assignments",
    security(("bearer" = []))
)]
async fn assignment_latex_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let module = owned_module(&state, user, id).await?;
    let latex = module
        .assignment_latex()
        .ok_or_else(|| WebError::resource_not_found(ResourceType::Assignment))?;

    Ok((
        StatusCode::OK,
        Json(LatexResponse {
            latex: latex.to_string(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments/{id}/pdf",
    description = "Renders the module's assignment as a PDF",
    params(("id" = Uuid, Path, description = "Module id")),
    responses(
        (status = 200, description = "Assignment as application/pdf"),
        (status = 400, description = "Malformed module id", body = ErrorResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 403, description = "Module belongs to another user", body = ErrorResponse),
        (status = 404, description = "Module or assignment not found", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse),
    ),
    tag = "assignments",
    security(("bearer" = []))
)]
async fn assignment_pdf_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let module = owned_module(&state, user, id).await?;
    let latex = module
        .assignment_latex()
        .ok_or_else(|| WebError::resource_not_found(ResourceType::Assignment))?;

    let pdf = document::render_assignment_pdf(module.title(), latex).map_err(|e| match e {
        document::RenderError::EmptyDocument => WebError::resource_not_found(ResourceType::Assignment),
        e => WebError::server_render_error(e),
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, String::from("application/pdf")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}_assignment.pdf\"", module.slug()),
            ),
        ],
        pdf,
    ))
}
