use async_trait::async_trait;
use beatstore_core::search::like_pattern;
use beatstore_core::types::DbId;

use super::{Store, StoreError, StoreResult, EMAIL_TAKEN};
use crate::models::account::{Account, CreateAccount, EnsureAdmin};
use crate::models::beat::{Beat, CreateBeat, UpdateBeat};
use crate::models::stats::StoreStats;
use crate::repositories::{AccountRepo, BeatRepo};
use crate::DbPool;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Constraint guarding account email uniqueness.
const EMAIL_CONSTRAINT: &str = "uq_accounts_email";

/// A [`Store`] backed by PostgreSQL through the repository layer.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Whether `err` is a unique violation on the named constraint.
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_account(&self, input: &CreateAccount) -> StoreResult<Account> {
        AccountRepo::create(&self.pool, input).await.map_err(|e| {
            if is_unique_violation(&e, EMAIL_CONSTRAINT) {
                tracing::debug!(constraint = EMAIL_CONSTRAINT, "Duplicate account email");
                StoreError::Conflict(EMAIL_TAKEN.to_string())
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_account_by_id(&self, id: DbId) -> StoreResult<Option<Account>> {
        Ok(AccountRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(AccountRepo::find_by_email(&self.pool, email).await?)
    }

    async fn promote_account(&self, id: DbId) -> StoreResult<bool> {
        Ok(AccountRepo::promote_to_admin(&self.pool, id).await?)
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool> {
        Ok(AccountRepo::update_password(&self.pool, id, password_hash).await?)
    }

    async fn ensure_admin(&self, input: &EnsureAdmin) -> StoreResult<Account> {
        Ok(AccountRepo::ensure_admin(&self.pool, input).await?)
    }

    async fn create_beat(&self, input: &CreateBeat) -> StoreResult<Beat> {
        Ok(BeatRepo::create(&self.pool, input).await?)
    }

    async fn find_beat(&self, id: DbId) -> StoreResult<Option<Beat>> {
        Ok(BeatRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_beats(&self) -> StoreResult<Vec<Beat>> {
        Ok(BeatRepo::list(&self.pool).await?)
    }

    async fn search_beats(&self, query: &str) -> StoreResult<Vec<Beat>> {
        Ok(BeatRepo::search(&self.pool, &like_pattern(query)).await?)
    }

    async fn list_beats_by_genre(&self, genre: &str) -> StoreResult<Vec<Beat>> {
        Ok(BeatRepo::list_by_genre(&self.pool, genre).await?)
    }

    async fn update_beat(&self, id: DbId, input: &UpdateBeat) -> StoreResult<Option<Beat>> {
        Ok(BeatRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_beat(&self, id: DbId) -> StoreResult<Option<Beat>> {
        Ok(BeatRepo::delete(&self.pool, id).await?)
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let beat_count = BeatRepo::count(&self.pool).await?;
        let (account_count, admin_count) = AccountRepo::counts(&self.pool).await?;
        Ok(StoreStats {
            beat_count,
            account_count,
            admin_count,
        })
    }
}
