//! Startup reconciliation of the designated administrator account.

use beatstore_core::account::{normalize_email, BOOTSTRAP_ADMIN_USERNAME};
use beatstore_db::models::account::{Account, EnsureAdmin};
use beatstore_db::store::{Store, StoreResult};

use crate::config::AdminConfig;

/// Make sure the account for `ADMIN_EMAIL` exists and is an administrator.
///
/// With `ADMIN_PASSWORD` set this is a single upsert: a missing account is
/// created with that password, an existing one keeps its password and only
/// gains the flag. Without a password an existing account is promoted and a
/// missing one is left for registration. Safe to run on every start.
pub async fn ensure_admin_account(
    store: &dyn Store,
    admin: &AdminConfig,
) -> StoreResult<Option<Account>> {
    let Some(email) = admin.email.as_deref() else {
        tracing::info!("ADMIN_EMAIL not set, skipping admin bootstrap");
        return Ok(None);
    };
    let email = normalize_email(email);

    if let Some(password_hash) = &admin.password_hash {
        let account = store
            .ensure_admin(&EnsureAdmin {
                username: BOOTSTRAP_ADMIN_USERNAME.to_string(),
                email,
                password_hash: password_hash.clone(),
            })
            .await?;
        tracing::info!(account_id = account.id, "Administrator account ensured");
        return Ok(Some(account));
    }

    match store.find_account_by_email(&email).await? {
        Some(account) => {
            if store.promote_account(account.id).await? {
                tracing::info!(account_id = account.id, "Existing account promoted to administrator");
            }
            Ok(Some(Account {
                is_admin: true,
                ..account
            }))
        }
        None => {
            tracing::warn!(
                "ADMIN_PASSWORD not set and no account exists for ADMIN_EMAIL; \
                 it will be promoted on first login after registration"
            );
            Ok(None)
        }
    }
}
