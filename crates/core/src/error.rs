use crate::types::DbId;

/// Message returned for every failed login, whichever field was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Domain-level error shared by the storage and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Missing, malformed, or out-of-range input.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad credentials, or a missing / malformed / expired token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid token, but the account is not an administrator.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The generic login failure. Never reveals whether the email exists.
    pub fn invalid_credentials() -> Self {
        CoreError::Unauthorized(INVALID_CREDENTIALS.to_string())
    }
}
