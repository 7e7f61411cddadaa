//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use beatstore_core::error::CoreError;
use beatstore_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

const MISSING_HEADER: &str = "Missing Authorization header";
const NOT_BEARER: &str = "Invalid Authorization format. Expected: Bearer <token>";
const BAD_TOKEN: &str = "Invalid or expired token";

/// Caller identified by a session token in `Authorization: Bearer <token>`.
///
/// Built from the verified claims alone; the account row is not consulted,
/// so a promotion only takes effect at the next login.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: DbId,
    pub email: String,
    pub is_admin: bool,
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// Pull the raw token out of the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized(MISSING_HEADER))?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(unauthorized(NOT_BEARER)),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            unauthorized(BAD_TOKEN)
        })?;

        Ok(AuthUser {
            account_id: claims.sub,
            email: claims.email,
            is_admin: claims.is_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_token_after_bearer_prefix() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert_matches!(
            bearer_token(&HeaderMap::new()),
            Err(AppError::Core(CoreError::Unauthorized(msg))) if msg == MISSING_HEADER
        );
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_rejected() {
        for value in ["Basic dXNlcjpwYXNz", "bearer abc", "Bearer ", "abc.def.ghi"] {
            assert_matches!(
                bearer_token(&headers(value)),
                Err(AppError::Core(CoreError::Unauthorized(msg))) if msg == NOT_BEARER,
                "{value:?} should be rejected"
            );
        }
    }
}
