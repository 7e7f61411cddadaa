//! Handlers for hosted checkout sessions.

use axum::extract::{Path, State};
use axum::Json;
use beatstore_cloud::payments::{
    is_session_id, CheckoutItem, CheckoutSession, NewCheckout, PaymentError,
};
use beatstore_core::error::CoreError;
use beatstore_core::pricing::to_minor_units;
use beatstore_core::types::DbId;
use beatstore_db::models::beat::Beat;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{lenient, ValidatedJson};
use crate::state::AppState;

/// One cart entry. The client sends whole listing objects; only the id is
/// read, everything else comes from the catalog. The id may be a number or
/// a numeric string.
#[derive(Debug, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, alias = "_id", deserialize_with = "lenient::number")]
    pub id: Option<DbId>,
}

/// Request body for `POST /api/create-checkout-session`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCheckoutRequest {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub cart: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    pub session_id: String,
    /// Hosted payment page to redirect the customer to.
    pub url: Option<String>,
}

/// POST /api/create-checkout-session
///
/// Resolve each cart id against the catalog and open a payment-mode checkout
/// with one line item per listing, priced from the catalog.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCheckoutRequest>,
) -> AppResult<Json<CreateCheckoutResponse>> {
    if input.cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let mut items = Vec::with_capacity(input.cart.len());
    for entry in &input.cart {
        let id = entry
            .id
            .ok_or_else(|| AppError::BadRequest("Cart item is missing an id".into()))?;
        let beat = state.store.find_beat(id).await?.ok_or_else(|| {
            AppError::BadRequest(format!("Beat {id} is no longer available"))
        })?;
        items.push(line_item(&beat)?);
    }

    let checkout = NewCheckout {
        items,
        currency: state.config.checkout.currency.clone(),
        success_url: state.config.checkout.success_url(),
        cancel_url: state.config.checkout.cancel_url(),
    };
    let session = state.payments.create_checkout_session(&checkout).await?;

    tracing::info!(
        session_id = %session.id,
        item_count = checkout.items.len(),
        "Checkout session created"
    );

    Ok(Json(CreateCheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// GET /api/checkout-session/{id}
///
/// Ids that are not shaped like a session id are answered with 404 without
/// contacting the processor.
pub async fn get_checkout_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<CheckoutSession>> {
    let session_id = session_id.trim();
    if !is_session_id(session_id) {
        tracing::debug!(session_id, "Refused malformed checkout session id");
        return Err(PaymentError::InvalidSessionId.into());
    }

    let session = state.payments.retrieve_checkout_session(session_id).await?;
    Ok(Json(session))
}

fn line_item(beat: &Beat) -> Result<CheckoutItem, CoreError> {
    Ok(CheckoutItem {
        beat_id: beat.id,
        name: beat.title.clone(),
        description: format!("{} beat - {} BPM", beat.genre, beat.bpm),
        image: Some(beat.picture.clone()),
        unit_amount: to_minor_units(beat.price)?,
    })
}
