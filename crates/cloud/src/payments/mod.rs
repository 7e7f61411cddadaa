//! Checkout-session creation through a hosted payment processor.

use async_trait::async_trait;
use serde::Serialize;

mod stripe;

pub use stripe::{StripeClient, StripeConfig, DEFAULT_STRIPE_API_BASE};

/// One purchasable line in a checkout (always quantity 1).
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutItem {
    /// Catalog id of the beat being bought.
    pub beat_id: i64,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    /// Price in minor currency units (cents).
    pub unit_amount: i64,
}

/// Everything needed to open a hosted checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckout {
    pub items: Vec<CheckoutItem>,
    /// ISO currency code, lower case (e.g. `usd`).
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// A checkout session as reported by the processor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page, when the processor provides one.
    pub url: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// No processor credentials were configured.
    #[error("Payments are not configured")]
    NotConfigured,

    /// The processor rejected the request.
    #[error("Payment processor returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The processor could not be reached or returned an unreadable body.
    #[error("Payment processor request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The id is not shaped like a checkout session id; nothing was sent.
    #[error("Not a checkout session id")]
    InvalidSessionId,
}

/// Whether `id` looks like a checkout session id (`cs_` followed by
/// letters, digits and underscores).
///
/// Ids reach the processor as a URL path segment, so anything else is
/// refused before a request is built.
pub fn is_session_id(id: &str) -> bool {
    id.strip_prefix("cs_").is_some_and(|rest| {
        !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

/// A hosted payment processor able to open and look up checkout sessions.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        checkout: &NewCheckout,
    ) -> Result<CheckoutSession, PaymentError>;

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError>;
}

/// Gateway used when no processor is configured; every call fails with
/// [`PaymentError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGateway;

#[async_trait]
impl PaymentGateway for DisabledGateway {
    async fn create_checkout_session(
        &self,
        _checkout: &NewCheckout,
    ) -> Result<CheckoutSession, PaymentError> {
        Err(PaymentError::NotConfigured)
    }

    async fn retrieve_checkout_session(
        &self,
        _session_id: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        Err(PaymentError::NotConfigured)
    }
}
