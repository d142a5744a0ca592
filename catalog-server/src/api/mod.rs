//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`categories`] - 分类管理接口
//! - [`products`] - 商品管理接口 (含批量创建)
//! - [`analytics`] - 仪表盘统计
//! - [`export`] - 商品导出 (JSON / CSV)
//! - [`audit_log`] - 审计日志查询

pub mod extract;

pub mod analytics;
pub mod audit_log;
pub mod categories;
pub mod export;
pub mod health;
pub mod products;

use axum::Router;
use http::{HeaderName, HeaderValue};
use shared::error::{AppError, ErrorCode};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(analytics::router())
        .merge(export::router())
        .merge(audit_log::router())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Endpoint not found")
}

/// Build the full application: routes, middleware and state
///
/// Used by the HTTP server and by in-process `oneshot` tests alike.
pub fn build_app(state: ServerState) -> Router {
    let request_timeout = state.config.request_timeout();

    build_router()
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - Request tracing
        .layer(TraceLayer::new_for_http())
        // Abort handlers that exceed REQUEST_TIMEOUT_MS (408)
        .layer(TimeoutLayer::new(request_timeout))
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
