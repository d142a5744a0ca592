//! 核心模块 - 服务器配置、状态、后台任务和错误定义
//!
//! # 模块结构
//!
//! - [`Config`] - 服务器配置
//! - [`ServerState`] - 服务器状态 (存储句柄 + 审计/统计队列)
//! - [`Server`] - HTTP 服务器
//! - [`BackgroundTasks`] - 后台 worker 管理
//! - [`ServerError`] - 进程级错误

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
pub use tasks::BackgroundTasks;
