//! 工具模块
//!
//! - [`logger`] - 日志初始化与滚动文件清理

pub mod logger;
