//! Route definitions for checkout sessions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::checkout;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// POST /create-checkout-session   -> create_checkout_session
/// GET  /checkout-session/{id}     -> get_checkout_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/create-checkout-session",
            post(checkout::create_checkout_session),
        )
        .route(
            "/checkout-session/{id}",
            get(checkout::get_checkout_session),
        )
}

/// The processor's webhook, mounted at the root (`POST /webhook`).
pub fn webhook_router() -> Router<AppState> {
    Router::new().route("/webhook", post(crate::handlers::webhook::receive_webhook))
}
