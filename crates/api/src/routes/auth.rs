//! Route definitions for registration, login, and the caller's account.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// POST /register           -> register
/// POST /login              -> login
/// GET  /account            -> current_account (requires auth)
/// PUT  /account/password   -> change_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/account", get(auth::current_account))
        .route("/account/password", put(auth::change_password))
}
