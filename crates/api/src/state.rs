use std::sync::Arc;

use beatstore_cloud::media::MediaStorage;
use beatstore_cloud::payments::PaymentGateway;
use beatstore_db::store::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Account and catalog storage (Postgres, or in-memory for `memory://`).
    pub store: Arc<dyn Store>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Hosted checkout provider.
    pub payments: Arc<dyn PaymentGateway>,
    /// Media host for cover art and audio cleanup.
    pub media: Arc<dyn MediaStorage>,
}
