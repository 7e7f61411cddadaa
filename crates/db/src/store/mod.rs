//! Storage abstraction used by the HTTP layer.
//!
//! [`Store`] is implemented by [`PgStore`] (production, backed by the
//! repositories) and [`MemoryStore`] (`DATABASE_URL=memory://`, tests). Both
//! implementations share the matching rules in `beatstore_core::search` and
//! enforce email uniqueness, so callers cannot tell them apart.

use async_trait::async_trait;
use beatstore_core::types::DbId;

use crate::models::account::{Account, CreateAccount, EnsureAdmin};
use crate::models::beat::{Beat, CreateBeat, UpdateBeat};
use crate::models::stats::StoreStats;

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Message carried by the conflict raised for a duplicate account email.
pub const EMAIL_TAKEN: &str = "email already registered";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule was violated (e.g. duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Any other failure in the underlying database.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistent storage for accounts and beats.
///
/// Every method is a single independent read or write; no method spans a
/// transaction.
#[async_trait]
pub trait Store: Send + Sync {
    /// Confirm the backing storage is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    /// Insert an account. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create_account(&self, input: &CreateAccount) -> StoreResult<Account>;
    async fn find_account_by_id(&self, id: DbId) -> StoreResult<Option<Account>>;
    /// Look up by normalized email.
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    /// Set the administrator flag. Returns `true` if it changed.
    async fn promote_account(&self, id: DbId) -> StoreResult<bool>;
    /// Replace the password hash. Returns `false` if the account is gone.
    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool>;
    /// Upsert the bootstrap administrator (see [`EnsureAdmin`]).
    async fn ensure_admin(&self, input: &EnsureAdmin) -> StoreResult<Account>;

    async fn create_beat(&self, input: &CreateBeat) -> StoreResult<Beat>;
    async fn find_beat(&self, id: DbId) -> StoreResult<Option<Beat>>;
    /// All beats in insertion order.
    async fn list_beats(&self) -> StoreResult<Vec<Beat>>;
    /// Beats whose title or genre contains `query`, ignoring case.
    async fn search_beats(&self, query: &str) -> StoreResult<Vec<Beat>>;
    /// Beats whose genre equals `genre`, ignoring case.
    async fn list_beats_by_genre(&self, genre: &str) -> StoreResult<Vec<Beat>>;
    /// Apply the `Some` fields of `input`. Returns `None` if the beat is gone.
    async fn update_beat(&self, id: DbId, input: &UpdateBeat) -> StoreResult<Option<Beat>>;
    /// Remove a beat, returning the removed row, or `None` if it did not exist.
    async fn delete_beat(&self, id: DbId) -> StoreResult<Option<Beat>>;

    async fn stats(&self) -> StoreResult<StoreStats>;
}
