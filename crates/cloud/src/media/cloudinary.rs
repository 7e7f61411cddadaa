//! Cloudinary asset deletion via the signed `destroy` endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use super::{MediaError, MediaKind, MediaStorage};
use crate::signing::sha256_hex;

/// Default Cloudinary API base URL.
pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// [`MediaStorage`] backed by Cloudinary.
pub struct CloudinaryStorage {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Signature over the alphabetically sorted parameters followed by the
    /// API secret.
    fn sign(&self, public_id: &str, timestamp: i64) -> String {
        let to_sign = format!(
            "public_id={public_id}&timestamp={timestamp}{}",
            self.config.api_secret
        );
        sha256_hex(to_sign.as_bytes())
    }
}

/// Cloudinary stores audio under the `video` resource type.
fn resource_type(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image",
        MediaKind::Audio => "video",
    }
}

/// Extract the public id from a Cloudinary delivery URL.
///
/// `https://res.cloudinary.com/<cloud>/image/upload/v1712/beats/cover.jpg`
/// yields `beats/cover`: the path after `/upload/`, minus any transformation
/// or version segment, minus the file extension.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let (_, rest) = path.split_once("/upload/")?;

    let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    // Transformation segments (e.g. `w_300,h_300,c_fill`) precede the version.
    if let Some(version_at) = segments.iter().position(|s| is_version_segment(s)) {
        segments.drain(..=version_at);
    }

    let last = segments.pop()?;
    let stem = match last.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => last,
    };
    segments.push(stem);
    Some(segments.join("/"))
}

fn is_version_segment(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

#[async_trait]
impl MediaStorage for CloudinaryStorage {
    async fn delete(&self, url: &str, kind: MediaKind) -> Result<(), MediaError> {
        let public_id =
            public_id_from_url(url).ok_or_else(|| MediaError::UnmanagedUrl(url.to_string()))?;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.sign(&public_id, timestamp);

        let endpoint = format!(
            "{}/v1_1/{}/{}/destroy",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            resource_type(kind)
        );
        let form = [
            ("public_id", public_id.clone()),
            ("timestamp", timestamp.to_string()),
            ("api_key", self.config.api_key.clone()),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];

        let response = self.http.post(endpoint).form(&form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: DestroyResponse = response.json().await?;
        tracing::info!(%public_id, result = %body.result, "Cloudinary asset destroyed");
        Ok(())
    }
}
