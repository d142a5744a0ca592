//! 统计模块
//!
//! - [`AnalyticsService`] / [`AnalyticsWorker`]: 每日每动作计数器
//! - [`dashboard`]: 仪表盘聚合查询

pub mod dashboard;
pub mod service;
pub mod storage;
pub mod worker;

pub use dashboard::Dashboard;
pub use service::{AnalyticsEvent, AnalyticsService, actions};
pub use storage::AnalyticsStorage;
pub use worker::AnalyticsWorker;
