use thiserror::Error;

/// Failures of the identity layer. All of them surface as 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authorization header missing")]
    MissingCredential,

    #[error("Invalid authorization format")]
    MalformedCredential,

    #[error("Invalid or expired token")]
    InvalidOrExpiredCredential,
}
