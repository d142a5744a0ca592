use std::time::Duration;

/// 服务器配置 - 目录服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖（支持 `.env` 文件）：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | STORAGE_URL | rocksdb://{WORK_DIR}/database/catalog.db | SurrealDB 地址 (mem:// / rocksdb:// / ws://) |
/// | STORAGE_NAMESPACE | catalog | SurrealDB namespace |
/// | STORAGE_DATABASE | catalog | SurrealDB database |
/// | STORAGE_CONNECT_TIMEOUT_MS | 5000 | 连接超时(毫秒) |
/// | ITEMS_PER_PAGE | 10 | 默认分页大小 |
/// | AUDIT_BUFFER_SIZE | 1024 | 审计队列容量 |
/// | ANALYTICS_BUFFER_SIZE | 1024 | 统计队列容量 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | 生产环境 true | JSON 日志 |
/// | LOG_DIR | (无) | 日志文件目录 |
///
/// # 示例
///
/// ```ignore
/// STORAGE_URL=mem:// HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SurrealDB 连接地址
    pub storage_url: String,
    pub storage_namespace: String,
    pub storage_database: String,
    /// 连接超时 (毫秒)
    pub storage_connect_timeout_ms: u64,
    /// 默认分页大小
    pub items_per_page: u32,
    /// 审计 mpsc 通道容量
    pub audit_buffer_size: usize,
    /// 统计 mpsc 通道容量
    pub analytics_buffer_size: usize,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 运行环境: development | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// 日志文件目录 (None 表示仅控制台)
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            storage_url: std::env::var("STORAGE_URL")
                .unwrap_or_else(|_| format!("rocksdb://{}/database/catalog.db", work_dir)),
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            storage_namespace: std::env::var("STORAGE_NAMESPACE")
                .unwrap_or_else(|_| "catalog".into()),
            storage_database: std::env::var("STORAGE_DATABASE")
                .unwrap_or_else(|_| "catalog".into()),
            storage_connect_timeout_ms: std::env::var("STORAGE_CONNECT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            items_per_page: std::env::var("ITEMS_PER_PAGE")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(10),
            audit_buffer_size: std::env::var("AUDIT_BUFFER_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1024),
            analytics_buffer_size: std::env::var("ANALYTICS_BUFFER_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1024),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(is_production),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment,
        }
    }

    /// 使用自定义存储地址覆盖配置
    ///
    /// 常用于测试场景 (`mem://`)
    pub fn with_storage_url(storage_url: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.storage_url = storage_url.into();
        config
    }

    pub fn storage_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
