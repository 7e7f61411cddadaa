//! Route definitions for administrator-only views.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/api/admin`.
///
/// ```text
/// GET /dashboard   -> dashboard (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(admin::dashboard))
}
