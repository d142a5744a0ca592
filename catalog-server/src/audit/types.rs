//! 审计日志类型定义
//!
//! 所有条目只追加、不修改、不删除。

use serde::{Deserialize, Serialize};

/// 审计操作类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Read,
    Update,
    Delete,
    BulkCreate,
    BulkUpdate,
    BulkDelete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::BulkCreate => "bulk_create",
            Self::BulkUpdate => "bulk_update",
            Self::BulkDelete => "bulk_delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 调用方信息（来自请求头 / 连接）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeta {
    /// 调用方地址
    pub ip: Option<String>,
    /// User-Agent
    pub user_agent: Option<String>,
}

/// 审计日志条目（不可变）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 记录 ID
    pub id: String,
    /// 时间戳（Unix 毫秒）
    pub timestamp: i64,
    /// 操作类型
    pub action: AuditAction,
    /// 资源类型（如 "product", "category", "products", "export"）
    pub resource_type: String,
    /// 资源 ID（列表、批量操作为 None）
    #[serde(default)]
    pub resource_id: Option<String>,
    /// 结构化详情（JSON）
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default)]
    pub user_ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// 审计日志查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    /// 起始时间（Unix 毫秒，含）
    pub from: Option<i64>,
    /// 截止时间（Unix 毫秒，含）
    pub to: Option<i64>,
    /// 操作类型过滤
    pub action: Option<AuditAction>,
    /// 资源类型过滤
    pub resource_type: Option<String>,
    /// 分页偏移
    #[serde(default)]
    pub offset: usize,
    /// 分页大小（默认 50，最大 500）
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// 单次查询上限
pub const MAX_QUERY_LIMIT: usize = 500;

fn default_limit() -> usize {
    50
}

/// 审计日志列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        for (action, name) in [
            (AuditAction::Create, "create"),
            (AuditAction::Read, "read"),
            (AuditAction::BulkCreate, "bulk_create"),
            (AuditAction::BulkDelete, "bulk_delete"),
        ] {
            assert_eq!(serde_json::to_value(action).unwrap(), name);
            assert_eq!(action.to_string(), name);
        }
    }

    #[test]
    fn test_query_defaults() {
        let q: AuditQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.offset, 0);
        assert_eq!(q.limit, 50);
        assert!(q.action.is_none());
    }
}
