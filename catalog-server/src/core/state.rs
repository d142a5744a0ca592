use std::sync::Arc;

use shared::error::{AppError, AppResult};

use crate::analytics::{AnalyticsService, AnalyticsStorage, AnalyticsWorker};
use crate::audit::{AuditService, AuditStorage, AuditWorker};
use crate::core::{BackgroundTasks, Config};
use crate::db::{self, Storage};
use crate::utils::logger;

/// 服务器状态 - 持有所有共享句柄
///
/// 使用 Clone 浅拷贝（内部均为 Arc / channel sender），每个请求一份。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | storage | Option<Storage> | SurrealDB 连接，启动时连接失败则为 None |
/// | audit | AuditService | 审计日志投递 |
/// | analytics | AnalyticsService | 统计计数投递 |
///
/// 存储未连接时，除 `/health` 外的所有接口返回 503。
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    storage: Option<Storage>,
    pub audit: AuditService,
    pub analytics: AnalyticsService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 连接存储（带超时），失败时降级为"未连接"模式继续启动
    /// 2. 创建审计 / 统计队列并注册后台 worker（及日志清理任务）
    pub async fn initialize(config: &Config) -> (Self, BackgroundTasks) {
        let storage = match db::connect(config).await {
            Ok(db) => Some(db),
            Err(e) => {
                tracing::error!(
                    url = %config.storage_url,
                    "Storage connection failed, serving 503 until restart: {}",
                    e
                );
                None
            }
        };
        Self::build(config.clone(), storage)
    }

    /// 使用已有的存储连接构建状态（测试使用 `mem://`）
    pub fn with_storage(config: Config, storage: Storage) -> (Self, BackgroundTasks) {
        Self::build(config, Some(storage))
    }

    /// 无存储状态，所有数据接口返回 503
    pub fn disconnected(config: Config) -> (Self, BackgroundTasks) {
        Self::build(config, None)
    }

    fn build(config: Config, storage: Option<Storage>) -> (Self, BackgroundTasks) {
        let mut tasks = BackgroundTasks::new();

        let (audit, audit_rx) = AuditService::new(config.audit_buffer_size);
        let (analytics, analytics_rx) = AnalyticsService::new(config.analytics_buffer_size);

        // 日志目录清理（与存储无关）
        if let Some(dir) = &config.log_dir {
            let token = tasks.shutdown_token();
            tasks.spawn("log_cleanup", logger::periodic_cleanup(dir.into(), token));
        }

        // 无存储时不启动 worker，接收端随之关闭
        if let Some(db) = &storage {
            let token = tasks.shutdown_token();

            let worker = AuditWorker::new(AuditStorage::new(db.clone()));
            tasks.spawn("audit_worker", worker.run(audit_rx, token.clone()));

            let worker = AnalyticsWorker::new(AnalyticsStorage::new(db.clone()));
            tasks.spawn("analytics_worker", worker.run(analytics_rx, token));
        }

        let state = Self {
            config: Arc::new(config),
            storage,
            audit,
            analytics,
        };
        (state, tasks)
    }

    /// 获取存储句柄，未连接时返回 503
    pub fn storage(&self) -> AppResult<&Storage> {
        self.storage.as_ref().ok_or_else(AppError::storage_unavailable)
    }
}
