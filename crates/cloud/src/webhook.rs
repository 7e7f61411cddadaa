//! Payment-processor webhook verification.
//!
//! Stripe signs each delivery with a `Stripe-Signature` header of the form
//! `t=<unix seconds>,v1=<hex hmac>[,v1=<hex hmac>...]`, where each `v1` is the
//! HMAC-SHA256 of `"<t>.<raw body>"` under the endpoint's signing secret.

use serde::Deserialize;

use crate::signing::{hmac_sha256_hex, hmac_sha256_verify};

/// Name of the header carrying the signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum accepted age (and clock skew) of a signed timestamp.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Event type emitted when a customer finishes paying.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Malformed signature header")]
    MalformedHeader,

    #[error("No signature matches the payload")]
    SignatureMismatch,

    #[error("Signature timestamp is outside the tolerance window")]
    TimestampOutOfTolerance,

    #[error("Invalid event payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// A verified event delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    /// The resource the event is about (e.g. a checkout session).
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// The `id` of the event's object, if it has one.
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(|v| v.as_str())
    }
}

/// Parsed `Stripe-Signature` header.
struct SignatureHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

fn parse_header(header: &str) -> Result<SignatureHeader<'_>, WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let (key, value) = part
            .trim()
            .split_once('=')
            .ok_or(WebhookError::MalformedHeader)?;
        match key {
            "t" => {
                timestamp = Some(value.parse::<i64>().map_err(|_| WebhookError::MalformedHeader)?);
            }
            "v1" => signatures.push(value),
            // Other schemes (e.g. v0 test signatures) are ignored.
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok(SignatureHeader {
            timestamp,
            signatures,
        }),
        _ => Err(WebhookError::MalformedHeader),
    }
}

fn signed_payload(timestamp: i64, payload: &[u8]) -> Vec<u8> {
    let mut signed = format!("{timestamp}.").into_bytes();
    signed.extend_from_slice(payload);
    signed
}

/// Verify `header` against `payload` at time `now` (unix seconds).
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), WebhookError> {
    let parsed = parse_header(header)?;
    let signed = signed_payload(parsed.timestamp, payload);

    let matched = parsed
        .signatures
        .iter()
        .any(|sig| hmac_sha256_verify(secret.as_bytes(), &signed, sig));
    if !matched {
        return Err(WebhookError::SignatureMismatch);
    }

    if (now - parsed.timestamp).abs() > tolerance_secs {
        return Err(WebhookError::TimestampOutOfTolerance);
    }
    Ok(())
}

/// Verify a delivery and parse it into a [`WebhookEvent`].
pub fn construct_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<WebhookEvent, WebhookError> {
    verify_signature(payload, header, secret, tolerance_secs, now)?;
    Ok(serde_json::from_slice(payload)?)
}

/// Produce a `Stripe-Signature` header value for `payload` signed at
/// `timestamp`. Used to exercise the receiver locally.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signature = hmac_sha256_hex(secret.as_bytes(), &signed_payload(timestamp, payload));
    format!("t={timestamp},v1={signature}")
}
