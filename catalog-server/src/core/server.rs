//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use crate::core::{BackgroundTasks, Config, Result, ServerError, ServerState};

/// 关闭时等待队列排空的最长时间
const DRAIN_GRACE: Duration = Duration::from_secs(10);

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 运行直到收到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        let (state, tasks) = ServerState::initialize(&self.config).await;
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };
        serve(state, tasks, shutdown).await
    }
}

/// 监听端口并服务，`shutdown` 完成后停止接收新连接，
/// 然后关闭后台 worker（排空审计 / 统计队列）
pub async fn serve(
    state: ServerState,
    tasks: BackgroundTasks,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let port = state.config.http_port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { port, source })?;

    tasks.log_summary();
    tracing::info!("🦀 Catalog server listening on {}", addr);

    let app = crate::api::build_app(state);
    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(ServerError::Serve);

    tasks.shutdown(DRAIN_GRACE).await;
    result
}
