//! Handlers for the `/beats` catalog.
//!
//! Reads are public. Upload, update, and delete require an administrator.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use beatstore_cloud::media::MediaKind;
use beatstore_core::catalog::{optional_text, require_text};
use beatstore_core::error::CoreError;
use beatstore_core::pricing::to_minor_units;
use beatstore_core::search::normalize_query;
use beatstore_core::types::{Bpm, DbId, Price, ENTITY_BEAT};
use beatstore_db::models::beat::{Beat, CreateBeat, UpdateBeat};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{lenient, ValidatedJson};
use crate::middleware::rbac::RequireAdmin;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /beats/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Request body for `POST /upload-beat`. Every field is required; they are
/// `Option` so a missing field is reported alongside invalid ones.
#[derive(Debug, Deserialize, Validate)]
pub struct UploadBeatRequest {
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    #[validate(required, range(min = 1, max = 999))]
    pub bpm: Option<Bpm>,
    #[serde(default, deserialize_with = "lenient::number")]
    #[validate(required, range(exclusive_min = 0.0))]
    pub price: Option<Price>,
    #[validate(required, length(min = 1, max = 64))]
    pub genre: Option<String>,
    #[validate(required, url)]
    pub picture: Option<String>,
    #[validate(required, url)]
    pub audio: Option<String>,
}

/// Request body for `PUT /beats/{id}`. Only supplied fields change.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBeatRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    #[validate(range(min = 1, max = 999))]
    pub bpm: Option<Bpm>,
    #[serde(default, deserialize_with = "lenient::number")]
    #[validate(range(exclusive_min = 0.0))]
    pub price: Option<Price>,
    #[validate(length(min = 1, max = 64))]
    pub genre: Option<String>,
    #[validate(url)]
    pub picture: Option<String>,
    #[validate(url)]
    pub audio: Option<String>,
}

impl UploadBeatRequest {
    fn into_create(self) -> Result<CreateBeat, CoreError> {
        let (Some(title), Some(bpm), Some(price), Some(genre), Some(picture), Some(audio)) = (
            self.title,
            self.bpm,
            self.price,
            self.genre,
            self.picture,
            self.audio,
        ) else {
            return Err(CoreError::Validation("All fields are required".into()));
        };

        to_minor_units(price)?;

        Ok(CreateBeat {
            title: require_text("title", &title)?,
            bpm,
            price,
            genre: require_text("genre", &genre)?,
            picture: require_text("picture", &picture)?,
            audio: require_text("audio", &audio)?,
        })
    }
}

impl UpdateBeatRequest {
    fn into_update(self) -> Result<UpdateBeat, CoreError> {
        if let Some(price) = self.price {
            to_minor_units(price)?;
        }

        Ok(UpdateBeat {
            title: optional_text("title", self.title.as_deref())?,
            bpm: self.bpm,
            price: self.price,
            genre: optional_text("genre", self.genre.as_deref())?,
            picture: optional_text("picture", self.picture.as_deref())?,
            audio: optional_text("audio", self.audio.as_deref())?,
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/beats
pub async fn list_beats(State(state): State<AppState>) -> AppResult<Json<Vec<Beat>>> {
    let beats = state.store.list_beats().await?;
    Ok(Json(beats))
}

/// GET /api/beats/search?q=
///
/// Case-insensitive substring match on title or genre. A missing or blank
/// query returns the whole catalog.
pub async fn search_beats(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Beat>>> {
    let beats = match normalize_query(params.q.as_deref()) {
        Some(query) => state.store.search_beats(&query).await?,
        None => state.store.list_beats().await?,
    };
    Ok(Json(beats))
}

/// GET /api/beats/genre/{genre}
pub async fn beats_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> AppResult<Json<Vec<Beat>>> {
    let beats = state.store.list_beats_by_genre(genre.trim()).await?;
    Ok(Json(beats))
}

/// GET /api/beats/{id}
pub async fn get_beat(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Beat>> {
    let beat = state
        .store
        .find_beat(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(beat))
}

/// POST /api/upload-beat (alias: POST /api/beats/upload)
///
/// Create a listing from already-hosted cover and audio URLs.
pub async fn upload_beat(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<UploadBeatRequest>,
) -> AppResult<(StatusCode, Json<Beat>)> {
    let beat = state.store.create_beat(&input.into_create()?).await?;

    tracing::info!(beat_id = beat.id, admin_id = admin.account_id, "Beat uploaded");

    Ok((StatusCode::CREATED, Json(beat)))
}

/// PUT /api/beats/{id}
pub async fn update_beat(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateBeatRequest>,
) -> AppResult<Json<Beat>> {
    let beat = state
        .store
        .update_beat(id, &input.into_update()?)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(beat_id = id, admin_id = admin.account_id, "Beat updated");

    Ok(Json(beat))
}

/// DELETE /api/beats/{id}
///
/// Removes the listing, then asks the media host to drop its cover and
/// audio. Media failures are logged and do not affect the response.
pub async fn delete_beat(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let beat = state
        .store
        .delete_beat(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(beat_id = id, admin_id = admin.account_id, "Beat deleted");

    remove_media(&state, &beat).await;

    Ok(Json(MessageResponse::new("Beat deleted successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: ENTITY_BEAT,
        id,
    })
}

async fn remove_media(state: &AppState, beat: &Beat) {
    let assets = [
        (beat.picture.as_str(), MediaKind::Image),
        (beat.audio.as_str(), MediaKind::Audio),
    ];
    for (url, kind) in assets {
        if let Err(e) = state.media.delete(url, kind).await {
            tracing::warn!(beat_id = beat.id, ?kind, error = %e, "Failed to delete media asset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(body: serde_json::Value) -> UploadBeatRequest {
        serde_json::from_value(body).expect("body should deserialize")
    }

    fn full_upload() -> serde_json::Value {
        serde_json::json!({
            "title": " Night Drive ",
            "bpm": 140,
            "price": 29.99,
            "genre": "Trap",
            "picture": "https://cdn.test/cover.jpg",
            "audio": "https://cdn.test/track.mp3",
        })
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let mut body = full_upload();
        body["bpm"] = "92".into();
        body["price"] = " 19.5 ".into();
        let input = upload(body);
        assert_eq!(input.bpm, Some(92));
        assert_eq!(input.price, Some(19.5));
    }

    #[test]
    fn blank_numeric_string_counts_as_missing() {
        let mut body = full_upload();
        body["bpm"] = "".into();
        let input = upload(body);
        assert_eq!(input.bpm, None);
        assert!(input.validate().is_err());
    }

    #[test]
    fn non_numeric_string_is_a_deserialization_error() {
        let mut body = full_upload();
        body["price"] = "cheap".into();
        assert!(serde_json::from_value::<UploadBeatRequest>(body).is_err());
    }

    #[test]
    fn validation_names_missing_and_invalid_fields() {
        let mut body = full_upload();
        body.as_object_mut().unwrap().remove("title");
        body["bpm"] = 0.into();
        body["picture"] = "not a url".into();

        let errors = upload(body).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("bpm"));
        assert!(fields.contains_key("picture"));
        assert!(!fields.contains_key("genre"));
    }

    #[test]
    fn zero_price_is_invalid() {
        let mut body = full_upload();
        body["price"] = 0.into();
        assert!(upload(body).validate().is_err());
    }

    #[test]
    fn into_create_trims_text() {
        let create = upload(full_upload()).into_create().unwrap();
        assert_eq!(create.title, "Night Drive");
        assert_eq!(create.bpm, 140);
    }

    #[test]
    fn into_create_rejects_whitespace_title() {
        let mut body = full_upload();
        body["title"] = "   ".into();
        assert!(upload(body).into_create().is_err());
    }

    #[test]
    fn into_create_rejects_sub_cent_price() {
        let mut body = full_upload();
        body["price"] = 0.001.into();
        assert!(upload(body).into_create().is_err());
    }

    #[test]
    fn empty_update_changes_nothing() {
        let update = UpdateBeatRequest::default().into_update().unwrap();
        assert!(update.title.is_none());
        assert!(update.price.is_none());
    }
}
