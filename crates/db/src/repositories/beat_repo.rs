//! Repository for the `beats` table.

use beatstore_core::types::DbId;
use sqlx::PgPool;

use crate::models::beat::{Beat, CreateBeat, UpdateBeat};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, bpm, price, genre, picture, audio, created_at, updated_at";

/// Normalized genre; `idx_beats_genre_key` indexes this exact expression.
const GENRE_KEY: &str = "LOWER(BTRIM(genre))";

/// Provides CRUD operations for beats.
pub struct BeatRepo;

impl BeatRepo {
    /// Insert a new beat, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBeat) -> Result<Beat, sqlx::Error> {
        let query = format!(
            "INSERT INTO beats (title, bpm, price, genre, picture, audio) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Beat>(&query)
            .bind(&input.title)
            .bind(input.bpm)
            .bind(input.price)
            .bind(&input.genre)
            .bind(&input.picture)
            .bind(&input.audio)
            .fetch_one(pool)
            .await
    }

    /// Find a beat by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Beat>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM beats WHERE id = $1");
        sqlx::query_as::<_, Beat>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every beat in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Beat>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM beats ORDER BY id");
        sqlx::query_as::<_, Beat>(&query).fetch_all(pool).await
    }

    /// List beats whose title or genre matches an escaped `ILIKE` pattern
    /// (see `beatstore_core::search::like_pattern`).
    pub async fn search(pool: &PgPool, pattern: &str) -> Result<Vec<Beat>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM beats \
             WHERE title ILIKE $1 ESCAPE '\\' OR genre ILIKE $1 ESCAPE '\\' \
             ORDER BY id"
        );
        sqlx::query_as::<_, Beat>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// List beats whose genre equals `genre`, ignoring case and surrounding
    /// whitespace.
    pub async fn list_by_genre(pool: &PgPool, genre: &str) -> Result<Vec<Beat>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM beats \
             WHERE {GENRE_KEY} = LOWER(BTRIM($1)) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Beat>(&query)
            .bind(genre)
            .fetch_all(pool)
            .await
    }

    /// Update a beat. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBeat,
    ) -> Result<Option<Beat>, sqlx::Error> {
        let query = format!(
            "UPDATE beats SET \
                title = COALESCE($2, title), \
                bpm = COALESCE($3, bpm), \
                price = COALESCE($4, price), \
                genre = COALESCE($5, genre), \
                picture = COALESCE($6, picture), \
                audio = COALESCE($7, audio) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Beat>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.bpm)
            .bind(input.price)
            .bind(&input.genre)
            .bind(&input.picture)
            .bind(&input.audio)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a beat, returning the removed row (its media URLs are
    /// needed for cleanup). Returns `None` if no such row exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Beat>, sqlx::Error> {
        let query = format!("DELETE FROM beats WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Beat>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count all beats.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM beats")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
