//! Payment-processor webhook receiver.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use beatstore_cloud::payments::PaymentError;
use beatstore_cloud::webhook::{construct_event, CHECKOUT_COMPLETED, SIGNATURE_HEADER};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /webhook
///
/// Verifies the signature over the raw body, logs completed checkouts, and
/// acknowledges every verified event.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let checkout = &state.config.checkout;
    let Some(secret) = checkout.webhook_secret.as_deref() else {
        tracing::error!("Webhook received but STRIPE_WEBHOOK_SECRET is not set");
        return Err(PaymentError::NotConfigured.into());
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Webhook Error: missing signature header".into()))?;

    let now = chrono::Utc::now().timestamp();
    let event = construct_event(&body, signature, secret, checkout.webhook_tolerance_secs, now)
        .map_err(|e| {
            tracing::warn!(error = %e, "Webhook verification failed");
            AppError::BadRequest(format!("Webhook Error: {e}"))
        })?;

    if event.event_type == CHECKOUT_COMPLETED {
        tracing::info!(
            event_id = %event.id,
            session_id = event.object_id().unwrap_or("unknown"),
            "Checkout completed"
        );
    } else {
        tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Unhandled webhook event");
    }

    Ok(Json(WebhookAck { received: true }))
}
