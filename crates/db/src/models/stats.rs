//! Aggregate counts for the admin dashboard.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub beat_count: i64,
    pub account_count: i64,
    pub admin_count: i64,
}
