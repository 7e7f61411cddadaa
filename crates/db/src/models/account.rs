//! Account entity model and DTOs.

use beatstore_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full account row from the `accounts` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`AccountResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe account representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            is_admin: account.is_admin,
            created_at: account.created_at,
        }
    }
}

/// DTO for creating a new account. `email` must already be normalized and
/// `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// DTO for the startup admin reconciliation.
///
/// Applied as an upsert keyed on `email`: a missing account is created with
/// this hash and the admin flag; an existing account only gains the flag.
#[derive(Debug, Clone)]
pub struct EnsureAdmin {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
