//! Deletion of hosted media (cover art and audio) when a listing is removed.
//!
//! Uploads happen client-side straight to the CDN; the backend only stores
//! the resulting URLs. Deletion is best-effort: callers log failures and move
//! on, the listing record is already gone.

use async_trait::async_trait;

mod cloudinary;

pub use cloudinary::{
    public_id_from_url, CloudinaryConfig, CloudinaryStorage, DEFAULT_CLOUDINARY_API_BASE,
};

/// Which kind of asset a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The URL does not belong to the configured media host.
    #[error("Not a managed media URL: {0}")]
    UnmanagedUrl(String),

    #[error("Media host returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Media host request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A media host that can delete an asset by its public URL.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn delete(&self, url: &str, kind: MediaKind) -> Result<(), MediaError>;
}

/// Used when no media host is configured; deletion is a logged no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMediaStorage;

#[async_trait]
impl MediaStorage for NoopMediaStorage {
    async fn delete(&self, url: &str, kind: MediaKind) -> Result<(), MediaError> {
        tracing::debug!(%url, ?kind, "Media host not configured, leaving asset in place");
        Ok(())
    }
}
