//! 审计日志后台 Worker
//!
//! 从 mpsc 通道消费 AuditLogRequest，写入 SurrealDB。
//! 收到关闭信号后关闭通道并写完剩余条目再退出。

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::service::AuditLogRequest;
use super::storage::AuditStorage;
use crate::utils::logger::AUDIT_TARGET;

/// 审计日志后台 Worker
pub struct AuditWorker {
    storage: AuditStorage,
}

impl AuditWorker {
    pub fn new(storage: AuditStorage) -> Self {
        Self { storage }
    }

    /// 运行 worker（直到通道关闭或收到关闭信号）
    pub async fn run(self, mut rx: mpsc::Receiver<AuditLogRequest>, shutdown: CancellationToken) {
        tracing::info!("📋 Audit log worker started");

        loop {
            tokio::select! {
                req = rx.recv() => match req {
                    Some(req) => self.write(req).await,
                    None => break,
                },
                _ = shutdown.cancelled() => {
                    rx.close();
                    let mut drained = 0usize;
                    while let Some(req) = rx.recv().await {
                        self.write(req).await;
                        drained += 1;
                    }
                    tracing::debug!(drained, "Audit queue drained");
                    break;
                }
            }
        }

        tracing::info!("Audit log worker stopping");
    }

    async fn write(&self, req: AuditLogRequest) {
        let action = req.action;
        let resource = req.resource_type.clone();
        let resource_id = req.resource_id.clone();
        match self.storage.append(req).await {
            Ok(id) => {
                tracing::info!(
                    target: AUDIT_TARGET,
                    audit_id = %id,
                    action = %action,
                    resource = %resource,
                    resource_id = resource_id.as_deref().unwrap_or("-"),
                    "Audit entry recorded"
                );
            }
            Err(e) => {
                tracing::error!(action = %action, resource = %resource, "Failed to write audit entry: {e}");
            }
        }
    }
}
