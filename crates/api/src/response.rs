//! Shared response types for API handlers.
//!
//! Listings and accounts are returned as bare JSON objects and arrays; only
//! acknowledgements need a wrapper.

use serde::Serialize;

/// `{ "message": "..." }` acknowledgement for operations with no resource to
/// return (delete, password change).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
