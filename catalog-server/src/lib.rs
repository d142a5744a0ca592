//! Catalog Server - 商品目录 REST 服务
//!
//! # 架构概述
//!
//! 基于 SurrealDB 的商品 / 分类管理后端：
//!
//! - **HTTP API** (`api`): 商品 CRUD、批量创建、分类、仪表盘、导出
//! - **数据库** (`db`): SurrealDB 连接、schema、repository
//! - **业务规则** (`catalog`): 字段校验、列表筛选
//! - **审计** (`audit`): 只追加的操作日志（异步队列）
//! - **统计** (`analytics`): 每日计数器与仪表盘聚合
//!
//! # 模块结构
//!
//! ```text
//! catalog-server/src/
//! ├── core/          # 配置、状态、后台任务、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 商品、分类、导出服务
//! ├── catalog/       # 校验、筛选
//! ├── audit/         # 审计日志
//! ├── analytics/     # 统计
//! ├── db/            # 数据库层
//! └── utils/         # 日志
//! ```

pub mod analytics;
pub mod api;
pub mod audit;
pub mod catalog;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{BackgroundTasks, Config, Server, ServerState};
pub use shared::error::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// 按配置初始化日志
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    init_logger_with_file(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )?;
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#
    );
}
