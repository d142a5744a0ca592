//! 审计日志服务
//!
//! `AuditService` 只负责投递：请求处理路径把记录放进 mpsc 通道后立即返回，
//! 由 [`AuditWorker`](super::worker::AuditWorker) 异步写入 SurrealDB。
//! 写入失败只记录日志，永远不会影响 API 响应。

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::types::{AuditAction, RequestMeta};

/// 发送到 worker 的日志请求
#[derive(Debug, Clone)]
pub struct AuditLogRequest {
    pub timestamp: i64,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: serde_json::Value,
    pub meta: RequestMeta,
}

/// 审计日志服务（可廉价克隆，内部仅持有发送端）
#[derive(Clone)]
pub struct AuditService {
    tx: mpsc::Sender<AuditLogRequest>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService")
            .field("capacity", &self.tx.capacity())
            .finish_non_exhaustive()
    }
}

impl AuditService {
    /// 创建审计服务，返回 (服务, 接收端)
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        (Self { tx }, rx)
    }

    /// 记录一次操作（fire-and-forget）
    ///
    /// 通道满时转入后台任务等待发送，不阻塞调用方。
    pub fn record(
        &self,
        action: AuditAction,
        resource_type: &str,
        resource_id: Option<String>,
        details: serde_json::Value,
        meta: &RequestMeta,
    ) {
        let req = AuditLogRequest {
            timestamp: shared::util::now_millis(),
            action,
            resource_type: resource_type.to_string(),
            resource_id,
            details,
            meta: meta.clone(),
        };

        match self.tx.try_send(req) {
            Ok(()) => {}
            Err(TrySendError::Full(req)) => {
                tracing::debug!(action = %req.action, "Audit channel full, deferring");
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = tx.send(req).await {
                        tracing::error!(
                            action = %e.0.action,
                            resource = %e.0.resource_type,
                            "Audit worker gone, entry dropped"
                        );
                    }
                });
            }
            Err(TrySendError::Closed(req)) => {
                tracing::error!(
                    action = %req.action,
                    resource = %req.resource_type,
                    "Audit worker gone, entry dropped"
                );
            }
        }
    }
}
