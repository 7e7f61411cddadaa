//! Stripe Checkout over the REST API (form-encoded requests, JSON responses).

use async_trait::async_trait;
use serde::Deserialize;

use super::{is_session_id, CheckoutSession, NewCheckout, PaymentError, PaymentGateway};

/// Default Stripe API base URL.
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Stripe credentials and endpoint.
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// Overridable for testing against a mock server.
    pub api_base: String,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// [`PaymentGateway`] backed by Stripe Checkout.
pub struct StripeClient {
    http: reqwest::Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn sessions_url(&self) -> String {
        format!(
            "{}/v1/checkout/sessions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    /// URL of one session, with the id appended as a single encoded segment.
    fn session_url(&self, session_id: &str) -> Result<reqwest::Url, PaymentError> {
        if !is_session_id(session_id) {
            return Err(PaymentError::InvalidSessionId);
        }
        let mut url =
            reqwest::Url::parse(&self.sessions_url()).map_err(|_| PaymentError::InvalidSessionId)?;
        url.path_segments_mut()
            .map_err(|()| PaymentError::InvalidSessionId)?
            .push(session_id);
        Ok(url)
    }

    /// Turn a non-2xx response into [`PaymentError::Api`], or parse the session.
    async fn parse_session(response: reqwest::Response) -> Result<CheckoutSession, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "unreadable error body".to_string());
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let session: StripeSession = response.json().await?;
        Ok(session.into())
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(
        &self,
        checkout: &NewCheckout,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .http
            .post(self.sessions_url())
            .bearer_auth(&self.config.secret_key)
            .form(&checkout_form(checkout))
            .send()
            .await?;

        let session = Self::parse_session(response).await?;
        tracing::info!(session_id = %session.id, items = checkout.items.len(), "Stripe checkout session created");
        Ok(session)
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = self.session_url(session_id)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        Self::parse_session(response).await
    }
}

/// Encode a checkout as Stripe's bracketed form parameters.
pub(crate) fn checkout_form(checkout: &NewCheckout) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("success_url".to_string(), checkout.success_url.clone()),
        ("cancel_url".to_string(), checkout.cancel_url.clone()),
    ];

    for (i, item) in checkout.items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        let price = format!("{prefix}[price_data]");
        let product = format!("{price}[product_data]");
        form.push((format!("{price}[currency]"), checkout.currency.clone()));
        form.push((format!("{price}[unit_amount]"), item.unit_amount.to_string()));
        form.push((format!("{product}[name]"), item.name.clone()));
        form.push((format!("{product}[description]"), item.description.clone()));
        if let Some(image) = &item.image {
            form.push((format!("{product}[images][0]"), image.clone()));
        }
        form.push((format!("{prefix}[quantity]"), "1".to_string()));
    }

    let beat_ids: Vec<String> = checkout.items.iter().map(|i| i.beat_id.to_string()).collect();
    form.push(("metadata[beat_ids]".to_string(), beat_ids.join(",")));
    form
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
    status: Option<String>,
    payment_status: Option<String>,
    amount_total: Option<i64>,
    currency: Option<String>,
    customer_details: Option<StripeCustomerDetails>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomerDetails {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: String,
}

impl From<StripeSession> for CheckoutSession {
    fn from(s: StripeSession) -> Self {
        Self {
            id: s.id,
            url: s.url,
            status: s.status,
            payment_status: s.payment_status,
            amount_total: s.amount_total,
            currency: s.currency,
            customer_email: s.customer_details.and_then(|d| d.email),
        }
    }
}
