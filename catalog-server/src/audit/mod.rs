//! 审计日志模块
//!
//! 每个 API 操作（读、写、导出）都会留下一条只追加的审计记录：
//!
//! - [`AuditService`]: 请求路径上的投递端（fire-and-forget）
//! - [`AuditWorker`]: 后台写入 SurrealDB
//! - [`AuditStorage`]: append / query，没有修改和删除接口

pub mod service;
pub mod storage;
pub mod types;
pub mod worker;

pub use service::{AuditLogRequest, AuditService};
pub use storage::{AuditStorage, AuditStorageError};
pub use types::{AuditAction, AuditEntry, AuditListResponse, AuditQuery, RequestMeta};
pub use worker::AuditWorker;
