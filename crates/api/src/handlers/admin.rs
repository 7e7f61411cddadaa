//! Handlers for the admin dashboard.

use axum::extract::State;
use axum::Json;
use beatstore_db::models::stats::StoreStats;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub stats: StoreStats,
}

/// GET /api/admin/dashboard
///
/// Catalog and account counts.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DashboardResponse>> {
    let stats = state.store.stats().await?;
    tracing::debug!(admin_id = admin.account_id, "Dashboard viewed");
    Ok(Json(DashboardResponse {
        message: "Admin dashboard data",
        stats,
    }))
}
