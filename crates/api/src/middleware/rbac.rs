//! Access-control extractors layered on [`AuthUser`].
//!
//! Handlers state their requirement in their signature; a request that does
//! not meet it never reaches the handler body.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use beatstore_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Any signed-in account. 401 without a valid token.
pub struct RequireAuth(pub AuthUser);

/// An administrator. 401 without a valid token, 403 when the token lacks
/// the administrator flag.
///
/// ```ignore
/// async fn remove(RequireAdmin(admin): RequireAdmin, Path(id): Path<DbId>) -> AppResult<Json<MessageResponse>> {
///     # unimplemented!()
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_request_parts(parts, state).await.map(RequireAuth)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.is_admin {
            return Ok(RequireAdmin(user));
        }
        tracing::debug!(account_id = user.account_id, "Non-admin refused");
        Err(CoreError::Forbidden("Admin access required".into()).into())
    }
}
