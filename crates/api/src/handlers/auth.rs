//! Handlers for registration, login, and the caller's own account.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use beatstore_core::account::{is_designated_admin, normalize_email, MIN_PASSWORD_LENGTH};
use beatstore_core::catalog::require_text;
use beatstore_core::error::CoreError;
use beatstore_core::types::{DbId, ENTITY_ACCOUNT};
use beatstore_db::models::account::{Account, AccountResponse, CreateAccount};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, verify_without_account,
};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::rbac::RequireAuth;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for `PUT /api/account/password`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    pub new_password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Display name.
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/register
///
/// Create a regular account. Returns 201 with the account, 409 if the email
/// is already registered.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let username = require_text("username", &input.username)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let account = state
        .store
        .create_account(&CreateAccount {
            username,
            email: normalize_email(&input.email),
            password_hash,
            is_admin: false,
        })
        .await?;

    tracing::info!(account_id = account.id, "Account registered");

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// POST /api/login
///
/// Authenticate with email + password and receive a session token. Every
/// failure is the same generic 401.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = normalize_email(&input.email);

    // 1. Find the account. A miss still pays for one hash verification.
    let Some(account) = state.store.find_account_by_email(&email).await? else {
        verify_without_account(&input.password);
        tracing::debug!("Login rejected: unknown email");
        return Err(CoreError::invalid_credentials().into());
    };

    // 2. Verify the password (stored hash, then the admin fallback if enabled).
    let designated = is_designated_admin(&account.email, state.config.admin.email.as_deref());
    if !password_accepted(&state, &account, &input.password, designated)? {
        tracing::debug!(account_id = account.id, "Login rejected");
        return Err(CoreError::invalid_credentials().into());
    }

    // 3. The designated administrator always carries the flag.
    let mut is_admin = account.is_admin;
    if designated && !is_admin {
        if state.store.promote_account(account.id).await? {
            tracing::warn!(account_id = account.id, "Designated administrator promoted at login");
        }
        is_admin = true;
    }

    // 4. Issue the token.
    let token = generate_token(account.id, &account.email, is_admin, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(account_id = account.id, is_admin, "Login succeeded");

    Ok(Json(LoginResponse {
        name: account.username,
        email: account.email,
        is_admin,
        token,
    }))
}

/// GET /api/account
///
/// The authenticated caller's account.
pub async fn current_account(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<AccountResponse>> {
    let account = find_account(&state, user.account_id).await?;
    Ok(Json(AccountResponse::from(&account)))
}

/// PUT /api/account/password
///
/// Replace the caller's password after re-checking the current one.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let account = find_account(&state, user.account_id).await?;

    let current_ok = verify_password(&input.current_password, &account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_ok {
        return Err(CoreError::Validation("Current password is incorrect".into()).into());
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !state.store.update_password(account.id, &password_hash).await? {
        return Err(not_found(account.id));
    }

    tracing::info!(account_id = account.id, "Password changed");

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: ENTITY_ACCOUNT,
        id,
    })
}

async fn find_account(state: &AppState, id: DbId) -> AppResult<Account> {
    state
        .store
        .find_account_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Check `password` against the stored hash and, for the designated
/// administrator with `ADMIN_PASSWORD_LOGIN` enabled, the configured
/// administrator password hash.
fn password_accepted(
    state: &AppState,
    account: &Account,
    password: &str,
    designated: bool,
) -> AppResult<bool> {
    let verify = |hash: &str| {
        verify_password(password, hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))
    };

    if verify(&account.password_hash)? {
        return Ok(true);
    }

    let admin = &state.config.admin;
    if !(designated && admin.password_login) {
        return Ok(false);
    }
    let Some(admin_hash) = &admin.password_hash else {
        return Ok(false);
    };

    let accepted = verify(admin_hash)?;
    if accepted {
        tracing::warn!(
            account_id = account.id,
            "Administrator authenticated with the configured fallback password"
        );
    }
    Ok(accepted)
}
