//! Track listing ("beat") entity model and DTOs.

use beatstore_core::types::{Bpm, DbId, Price, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `beats` table. Safe to serialize as-is.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
    pub id: DbId,
    pub title: String,
    pub bpm: Bpm,
    pub price: Price,
    pub genre: String,
    /// Cover image URL.
    pub picture: String,
    /// Audio file URL.
    pub audio: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new beat. All fields are required and pre-validated.
#[derive(Debug, Clone)]
pub struct CreateBeat {
    pub title: String,
    pub bpm: Bpm,
    pub price: Price,
    pub genre: String,
    pub picture: String,
    pub audio: String,
}

/// DTO for updating an existing beat. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateBeat {
    pub title: Option<String>,
    pub bpm: Option<Bpm>,
    pub price: Option<Price>,
    pub genre: Option<String>,
    pub picture: Option<String>,
    pub audio: Option<String>,
}
