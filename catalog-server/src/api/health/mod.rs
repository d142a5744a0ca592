//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 服务与存储连接状态 |
//!
//! ```json
//! { "status": "healthy", "storage_connected": true, "timestamp": "2024-01-01T00:00:00+00:00" }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::db;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    /// 存储是否可用
    storage_connected: bool,
    /// RFC 3339
    timestamp: String,
}

/// GET /health - 存储未连接时仍返回 200
async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let storage_connected = match state.storage() {
        Ok(storage) => db::ping(storage).await,
        Err(_) => false,
    };
    Json(HealthResponse {
        status: "healthy",
        storage_connected,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
