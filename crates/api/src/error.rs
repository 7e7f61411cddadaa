use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use beatstore_cloud::payments::PaymentError;
use beatstore_core::error::CoreError;
use beatstore_db::store::StoreError;
use serde_json::json;

/// Message sent in place of any 500-level failure detail.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Set once at startup; when true, 500 responses carry a `detail` field.
static EXPOSE_INTERNAL_DETAIL: OnceLock<bool> = OnceLock::new();

/// Include the underlying cause of internal errors in response bodies.
///
/// Only the first call has an effect.
pub fn expose_internal_detail(enabled: bool) {
    let _ = EXPOSE_INTERNAL_DETAIL.set(enabled);
}

fn internal_detail_exposed() -> bool {
    EXPOSE_INTERNAL_DETAIL.get().copied().unwrap_or(false)
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`StoreError`] for storage and
/// [`PaymentError`] for the checkout provider, plus HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, code, client-facing message, and (for 500s) the logged cause.
type Classified = (StatusCode, &'static str, String, Option<String>);

fn internal(detail: String) -> Classified {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
        Some(detail),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                    None,
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
                }
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::Internal(msg) => internal(msg.clone()),
            },

            // --- Storage errors ---
            AppError::Store(StoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None)
            }
            AppError::Store(StoreError::Database(err)) => classify_sqlx_error(err),

            // --- Checkout provider errors ---
            AppError::Payment(err) => classify_payment_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => internal(msg.clone()),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(detail) = detail.filter(|_| internal_detail_exposed()) {
            body["detail"] = json!(detail);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
            }
            internal(format!("Database error: {db_err}"))
        }
        other => internal(format!("Database error: {other}")),
    }
}

/// - Not configured maps to 503.
/// - A processor 404 or a malformed session id maps to 404.
/// - Everything else maps to 500; the processor's message is only logged.
fn classify_payment_error(err: &PaymentError) -> Classified {
    match err {
        PaymentError::NotConfigured => (
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            err.to_string(),
            None,
        ),
        PaymentError::Api { status: 404, .. } | PaymentError::InvalidSessionId => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Checkout session not found".to_string(),
            None,
        ),
        other => internal(other.to_string()),
    }
}
