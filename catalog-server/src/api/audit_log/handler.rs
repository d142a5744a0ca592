//! Audit Log API Handlers

use axum::{Json, extract::State};
use shared::error::AppResult;

use crate::api::extract::ApiQuery;
use crate::audit::{AuditListResponse, AuditQuery, AuditStorage};
use crate::core::ServerState;

/// GET /api/audit-logs — 查询审计日志（按时间倒序，本身不产生审计记录）
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<AuditQuery>,
) -> AppResult<Json<AuditListResponse>> {
    let storage = AuditStorage::new(state.storage()?.clone());
    let (items, total) = storage.query(&query).await?;
    Ok(Json(AuditListResponse { items, total }))
}
