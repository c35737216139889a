use thiserror::Error;

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur when talking to a content provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the API key.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider answered with an error status.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("network error: {0}")]
    NetworkError(String),

    /// The provider answered, but without any text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The provider's text could not be turned into usable content.
    #[error("could not parse provider output: {0}")]
    Unparseable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        Self::NetworkError(e.to_string())
    }
}
