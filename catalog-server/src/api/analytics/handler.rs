//! Analytics API Handlers

use axum::{Json, extract::State};
use shared::error::AppResult;

use crate::analytics::Dashboard;
use crate::audit::{AuditAction, RequestMeta};
use crate::core::ServerState;

/// GET /api/analytics/dashboard - 仪表盘汇总
pub async fn dashboard(
    State(state): State<ServerState>,
    meta: RequestMeta,
) -> AppResult<Json<Dashboard>> {
    let db = state.storage()?;
    let result = crate::analytics::dashboard::build(db, chrono::Utc::now()).await?;

    state.audit.record(
        AuditAction::Read,
        "analytics",
        None,
        serde_json::Value::Null,
        &meta,
    );
    Ok(Json(result))
}
