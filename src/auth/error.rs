use thiserror::Error;

pub type CryptResult<T> = std::result::Result<T, CryptError>;

/// Failures while hashing passwords or signing access tokens.
#[derive(Debug, Error)]
pub enum CryptError {
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("token lifetime of {0} minutes is out of range")]
    TokenLifetime(i64),
}
