//! Route definitions for the beat catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::beat;
use crate::state::AppState;

/// Routes mounted at `/api/beats`.
///
/// ```text
/// GET    /                -> list_beats
/// GET    /search?q=       -> search_beats
/// GET    /genre/{genre}   -> beats_by_genre
/// POST   /upload          -> upload_beat (admin)
/// GET    /{id}            -> get_beat
/// PUT    /{id}            -> update_beat (admin)
/// DELETE /{id}            -> delete_beat (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(beat::list_beats))
        .route("/search", get(beat::search_beats))
        .route("/genre/{genre}", get(beat::beats_by_genre))
        .route("/upload", post(beat::upload_beat))
        .route(
            "/{id}",
            get(beat::get_beat)
                .put(beat::update_beat)
                .delete(beat::delete_beat),
        )
}
