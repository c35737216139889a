use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use thiserror::Error;

use crate::{
    auth::CryptError,
    error::log_error,
    learning::{GradingError, document::RenderError},
    model::{DatabaseError, ResourceType},
    provider::ProviderError,
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("RegistrationUserConflict")]
    RegistrationUserConflict,
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationHeaderMalformed")]
    AuthenticationHeaderMalformed,

    #[error("AuthenticationTokenInvalid. Error: {error}")]
    AuthenticationTokenInvalid { error: jsonwebtoken::errors::Error },

    /// Valid signature, but the user is gone or deactivated.
    #[error("AuthenticationUserRevoked")]
    AuthenticationUserRevoked,

    #[error("AuthenticationRequired")]
    AuthenticationRequired,

    #[error("AuthenticationInvalidCredentials")]
    AuthenticationInvalidCredentials,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceForbidden: {resource_type:?}")]
    ResourceForbidden { resource_type: ResourceType },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceBadRequest: {resource_type:?}. Reason: {reason}")]
    ResourceBadRequest {
        resource_type: ResourceType,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("RequestInvalidBody: {0}")]
    RequestInvalidBody(String),

    #[error("RequestInvalidPath: {0}")]
    RequestInvalidPath(String),

    #[error("RequestInvalidQuery: {0}")]
    RequestInvalidQuery(String),

    #[error("RequestValidation: {0}")]
    RequestValidation(#[from] validator::ValidationErrors),
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("UpstreamProviderError: {0}")]
    UpstreamProviderError(#[from] ProviderError),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("ServerCryptError: {0}")]
    ServerCryptError(#[from] CryptError),

    #[error("ServerRenderError: {0}")]
    ServerRenderError(#[from] RenderError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ServerCryptError(_) => String::from("Internal server error."),
            Self::ServerRenderError(_) => String::from("Internal server error, unable to render document."),
        }
    }
}

impl RegistrationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RegistrationUserConflict => StatusCode::CONFLICT,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::RegistrationUserConflict => {
                String::from("Registration error, user already exists.")
            }
        }
    }
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationHeaderMalformed => {
                String::from("Authentication error, expected `Authorization: Bearer <token>`.")
            }
            Self::AuthenticationTokenInvalid { .. } => {
                String::from("Authentication error, token invalid or expired.")
            }
            Self::AuthenticationUserRevoked => {
                String::from("Authentication error, user no longer exists or is inactive.")
            }
            Self::AuthenticationRequired => String::from("Authentication required."),
            Self::AuthenticationInvalidCredentials => {
                String::from("Authentication error, user not found or password is invalid.")
            }
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceForbidden { .. } => StatusCode::FORBIDDEN,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResourceBadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { resource_type } => match resource_type {
                ResourceType::Assignment => String::from("No assignment available for this module."),
                _ => String::from("Resource error, resource not found."),
            },
            Self::ResourceForbidden { .. } => String::from("Resource error, resource forbidden."),
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
            Self::ResourceBadRequest { reason, .. } => {
                format!("Resource error, bad request: {reason}")
            }
        }
    }
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::RequestInvalidBody(reason) => format!("Request error, invalid body: {reason}"),
            Self::RequestInvalidPath(reason) => format!("Request error, invalid path: {reason}"),
            Self::RequestInvalidQuery(reason) => format!("Request error, invalid query: {reason}"),
            Self::RequestValidation(errors) => format!("Request error, validation failed: {errors}"),
        }
    }
}

impl UpstreamError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::UpstreamProviderError(e) => match e {
                ProviderError::Timeout(_) => String::from("Content provider timed out."),
                ProviderError::EmptyResponse | ProviderError::Unparseable(_) => {
                    String::from("Content provider returned unusable content.")
                }
                _ => String::from("Content provider is unavailable."),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("RegistrationError - {0}")]
    RegistrationError(#[from] RegistrationError),
    #[error("RequestError - {0}")]
    RequestError(#[from] RequestError),
    #[error("UpstreamError - {0}")]
    UpstreamError(#[from] UpstreamError),
    #[error("ServerError - {0}")]
    ServerError(#[from] ServerError),
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_forbidden(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceForbidden {
            resource_type: r#type,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    /// Like [`WebError::resource_fetch_error`], but a failed ownership check becomes 403.
    pub fn resource_access_error(r#type: ResourceType, error: DatabaseError) -> Self {
        match error {
            DatabaseError::Forbidden => Self::resource_forbidden(r#type),
            error => Self::resource_fetch_error(r#type, error),
        }
    }

    pub fn resource_bad_request<S: Into<String>>(r#type: ResourceType, reason: S) -> Self {
        Self::ResourceError(ResourceError::ResourceBadRequest {
            resource_type: r#type,
            reason: reason.into(),
        })
    }

    pub fn quiz_grading_error(e: GradingError) -> Self {
        Self::resource_bad_request(ResourceType::Quiz, e.to_string())
    }

    pub fn auth_header_malformed() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationHeaderMalformed)
    }

    pub fn auth_token_invalid(error: jsonwebtoken::errors::Error) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationTokenInvalid { error })
    }

    pub fn auth_user_revoked() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationUserRevoked)
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn auth_invalid_credentials() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationInvalidCredentials)
    }

    pub fn registration_conflict() -> Self {
        Self::RegistrationError(RegistrationError::RegistrationUserConflict)
    }

    pub fn invalid_body<S: Into<String>>(reason: S) -> Self {
        Self::RequestError(RequestError::RequestInvalidBody(reason.into()))
    }

    pub fn invalid_path<S: Into<String>>(reason: S) -> Self {
        Self::RequestError(RequestError::RequestInvalidPath(reason.into()))
    }

    pub fn invalid_query<S: Into<String>>(reason: S) -> Self {
        Self::RequestError(RequestError::RequestInvalidQuery(reason.into()))
    }

    pub fn provider_error(e: ProviderError) -> Self {
        Self::UpstreamError(UpstreamError::UpstreamProviderError(e))
    }

    pub fn server_crypt_error(e: CryptError) -> Self {
        Self::ServerError(ServerError::ServerCryptError(e))
    }

    pub fn server_render_error(e: RenderError) -> Self {
        Self::ServerError(ServerError::ServerRenderError(e))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::RegistrationError(e) => e.status_code(),
            Self::AuthenticationError(e) => e.status_code(),
            Self::RequestError(e) => e.status_code(),
            Self::UpstreamError(e) => e.status_code(),
            Self::ServerError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::RegistrationError(e) => e.client_display(),
            Self::AuthenticationError(e) => e.client_display(),
            Self::RequestError(e) => e.client_display(),
            Self::UpstreamError(e) => e.client_display(),
            Self::ServerError(e) => e.client_display(),
        }
    }
}

impl From<validator::ValidationErrors> for WebError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::RequestError(RequestError::RequestValidation(errors))
    }
}

#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let status_code = self.status_code();
        let display = self.client_display();

        let body = ErrorResponse {
            message: display,
            status_code: status_code.as_str().to_string(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        let mut response = (status_code, Json(body)).into_response();
        if status_code == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(WebError::auth_required().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(WebError::registration_conflict().status_code(), StatusCode::CONFLICT);
        assert_eq!(
            WebError::resource_access_error(ResourceType::Module, DatabaseError::Forbidden)
                .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            WebError::provider_error(ProviderError::Timeout(5)).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            WebError::quiz_grading_error(GradingError::NoQuestions).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(WebError::invalid_path("id").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(WebError::invalid_query("limit").status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_carries_challenge() {
        let response = WebError::auth_required().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

        let response = WebError::resource_not_found(ResourceType::Assignment).into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn provider_details_stay_internal() {
        let err = WebError::provider_error(ProviderError::ApiError {
            status: 500,
            message: "secret upstream body".to_string(),
        });
        assert!(!err.client_display().contains("secret"));
    }
}
