use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    auth,
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    web::{AppState, RequestContext, WebResult, context::AuthenticatedUser, error::WebError},
};

/// The token of an `Authorization: Bearer <token>` header, if there is one.
pub fn bearer_token(headers: &HeaderMap) -> WebResult<Option<&str>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| WebError::auth_header_malformed())?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(WebError::auth_header_malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(WebError::auth_header_malformed());
    }

    Ok(Some(token.trim()))
}

/// Rejects the request with 401 unless it carries a valid token of an
/// active user; otherwise stores the user in the [`RequestContext`].
pub async fn require_user_fn(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(req.headers())?.ok_or_else(WebError::auth_required)?;

    let claims = auth::process_token(token, state.auth().jwt_secret())
        .map_err(WebError::auth_token_invalid)?;

    let id = claims
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| WebError::auth_user_revoked())?;

    let user = UserEntity::find_by_id(state.pool(), &AuthenticatedUser::admin(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .filter(|user| user.is_active())
        .ok_or_else(WebError::auth_user_revoked)?;

    req.extensions_mut()
        .insert(RequestContext::new(Some(AuthenticatedUser::new(
            user.id(),
            user.role(),
        ))));

    Ok(next.run(req).await)
}
