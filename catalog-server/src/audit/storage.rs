//! 审计日志 SurrealDB 存储层
//!
//! Append-only 设计，没有任何删除/更新接口。

use thiserror::Error;

use super::service::AuditLogRequest;
use super::types::{AuditEntry, AuditQuery, MAX_QUERY_LIMIT};
use crate::db::Storage;

/// 存储错误
#[derive(Debug, Error)]
pub enum AuditStorageError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for AuditStorageError {
    fn from(err: surrealdb::Error) -> Self {
        AuditStorageError::Database(err.to_string())
    }
}

pub type AuditStorageResult<T> = Result<T, AuditStorageError>;

impl From<AuditStorageError> for shared::error::AppError {
    fn from(err: AuditStorageError) -> Self {
        shared::error::AppError::database(err.to_string())
    }
}

/// COUNT 结果
#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}

/// 插入用结构（不含 SurrealDB id）
#[derive(Debug, serde::Serialize)]
struct AuditInsert {
    timestamp: i64,
    action: super::types::AuditAction,
    resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_id: Option<String>,
    details: serde_json::Value,
    user_ip: Option<String>,
    user_agent: Option<String>,
}

/// 审计日志存储 (SurrealDB)
///
/// 仅提供 `append` 和 `query` 方法，没有 delete/update 接口。
#[derive(Clone)]
pub struct AuditStorage {
    db: Storage,
}

impl AuditStorage {
    pub fn new(db: Storage) -> Self {
        Self { db }
    }

    /// 追加一条审计日志，返回记录 ID
    pub async fn append(&self, req: AuditLogRequest) -> AuditStorageResult<String> {
        let insert = AuditInsert {
            timestamp: req.timestamp,
            action: req.action,
            resource_type: req.resource_type,
            resource_id: req.resource_id,
            details: req.details,
            user_ip: req.meta.ip,
            user_agent: req.meta.user_agent,
        };

        let mut res = self
            .db
            .query("CREATE audit_log CONTENT $data RETURN VALUE <string> record::id(id)")
            .bind(("data", insert))
            .await?
            .check()?;
        let ids: Vec<String> = res.take(0)?;
        Ok(ids.into_iter().next().unwrap_or_default())
    }

    /// 查询审计日志（按时间倒序）
    pub async fn query(&self, q: &AuditQuery) -> AuditStorageResult<(Vec<AuditEntry>, u64)> {
        let mut conditions = Vec::new();

        if q.from.is_some() {
            conditions.push("timestamp >= $from");
        }
        if q.to.is_some() {
            conditions.push("timestamp <= $to");
        }
        if q.action.is_some() {
            conditions.push("action = $action");
        }
        if q.resource_type.is_some() {
            conditions.push("resource_type = $resource_type");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT count() AS total FROM audit_log{where_clause} GROUP ALL; \
             SELECT *, <string> record::id(id) AS id FROM audit_log{where_clause} \
             ORDER BY timestamp DESC LIMIT {} START {}",
            q.limit.clamp(1, MAX_QUERY_LIMIT),
            q.offset
        );

        let mut qb = self.db.query(sql);

        if let Some(from) = q.from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = q.to {
            qb = qb.bind(("to", to));
        }
        if let Some(action) = q.action {
            qb = qb.bind(("action", action.as_str()));
        }
        if let Some(ref resource_type) = q.resource_type {
            qb = qb.bind(("resource_type", resource_type.clone()));
        }

        let mut result = qb.await?;

        let count_result: Vec<CountResult> = result.take(0)?;
        let total = count_result.first().map(|c| c.total).unwrap_or(0);

        let entries: Vec<AuditEntry> = result.take(1)?;

        Ok((entries, total))
    }
}
