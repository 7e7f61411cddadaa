//! Hosted-service integrations.
//!
//! - [`payments`] -- checkout sessions through a [`PaymentGateway`](payments::PaymentGateway)
//!   (Stripe in production).
//! - [`webhook`] -- payment-processor webhook signature verification.
//! - [`media`] -- best-effort deletion of uploaded cover art and audio
//!   through a [`MediaStorage`](media::MediaStorage) (Cloudinary in production).

pub mod media;
pub mod payments;
pub mod signing;
pub mod webhook;
