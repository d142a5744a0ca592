use thiserror::Error;

/// 进程级错误 (启动、监听、关闭)
///
/// 请求级错误统一使用 [`shared::error::AppError`]。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("无法绑定端口 {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP 服务异常退出: {0}")]
    Serve(#[source] std::io::Error),
}

/// 进程级 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
