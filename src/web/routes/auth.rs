use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};

use crate::{
    auth::{hash_password, issue_token, verify_password},
    model::{
        CrudRepository, DatabaseError, ResourceTyped,
        entity::{UserEntity, UserEntityCreate},
    },
    web::{
        AppState, AuthenticatedUser, UserRole, WebError, WebResult,
        dto::auth::{LoginBody, LoginResponse, RegisterBody},
        error::ErrorResponse,
        extract::ValidJson,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/api/v1/auth/register", post(register_handler))
        .route("/api/v1/auth/login", post(login_handler))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterBody,
    description = "Creates a new user account",
    responses(
        (status = 201, description = "User created successfully", body = UserEntity),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 409, description = "User already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[tracing::instrument(skip_all)]
async fn register_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterBody>,
) -> WebResult<impl IntoResponse> {
    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_email(state.pool(), &admin, &payload.email)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    if found.is_some() {
        return Err(WebError::registration_conflict());
    }

    let hash = hash_password(&payload.password).map_err(WebError::server_crypt_error)?;
    let payload = UserEntityCreate {
        email: payload.email,
        password_hash: hash,
        full_name: payload.full_name,
        role: UserRole::User,
    };

    // a concurrent registration can still win the race to the unique index
    let created = UserEntity::create(state.pool(), &admin, payload)
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => WebError::registration_conflict(),
            e => WebError::resource_fetch_error(UserEntity::get_resource_type(), e),
        })?;

    tracing::info!(user_id = %created.id(), "user registered");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    description = "Exchanges credentials for a bearer token",
    request_body = LoginBody,
    responses(
        (status = 200, description = "User signed in", body = LoginResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Credentials invalid", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth",
)]
#[tracing::instrument(skip_all)]
async fn login_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginBody>,
) -> WebResult<impl IntoResponse> {
    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_email(state.pool(), &admin, &payload.email)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .filter(|user| user.is_active())
        .ok_or_else(WebError::auth_invalid_credentials)?;

    let is_verified =
        verify_password(found.hash(), &payload.password).map_err(WebError::server_crypt_error)?;
    if !is_verified {
        return Err(WebError::auth_invalid_credentials());
    }

    let settings = state.auth();
    let token = issue_token(found.id(), settings.token_ttl_minutes(), settings.jwt_secret())
        .map_err(WebError::server_crypt_error)?;

    Ok((StatusCode::OK, Json(LoginResponse::bearer(token, found))))
}
