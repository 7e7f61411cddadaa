pub mod admin;
pub mod auth;
pub mod beat;
pub mod checkout;
pub mod health;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register                          register (public)
/// /login                             login (public)
/// /account                           current account (requires auth)
/// /account/password                  change password (requires auth)
///
/// /beats                             list (public)
/// /beats/search?q=                   search (public)
/// /beats/genre/{genre}               list by genre (public)
/// /beats/upload                      upload (admin only)
/// /beats/{id}                        get (public), update, delete (admin only)
/// /upload-beat                       upload (admin only)
///
/// /admin/dashboard                   counts (admin only)
///
/// /create-checkout-session           open a checkout (public)
/// /checkout-session/{id}             look up a checkout (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(checkout::router())
        .route("/upload-beat", post(handlers::beat::upload_beat))
        .nest("/beats", beat::router())
        .nest("/admin", admin::router())
}
