//! 统计事件投递
//!
//! 与审计日志相同的队列模型：请求路径只做 `try_send`，由后台 worker
//! 负责 upsert 计数器。统计写入失败不会影响任何 API 响应。

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// 统计动作名称
pub mod actions {
    pub const CATEGORY_CREATED: &str = "category_created";
    pub const PRODUCT_CREATED: &str = "product_created";
    pub const PRODUCT_UPDATED: &str = "product_updated";
    pub const PRODUCT_DELETED: &str = "product_deleted";
    pub const BULK_PRODUCTS_CREATED: &str = "bulk_products_created";
}

/// 单次统计事件
#[derive(Debug, Clone)]
pub struct AnalyticsEvent {
    /// UTC 日期 `YYYY-MM-DD`
    pub date: String,
    pub action: &'static str,
    /// 附加数据（追加到当日计数器的 data 列表）
    pub data: Option<serde_json::Value>,
    /// 事件时间（Unix 毫秒）
    pub timestamp: i64,
}

impl AnalyticsEvent {
    pub fn new(action: &'static str, data: Option<serde_json::Value>, at: DateTime<Utc>) -> Self {
        Self {
            date: at.format("%Y-%m-%d").to_string(),
            action,
            data,
            timestamp: at.timestamp_millis(),
        }
    }

    /// 计数器记录 key：`{date}_{action}`
    pub fn counter_key(&self) -> String {
        format!("{}_{}", self.date, self.action)
    }
}

/// 统计服务（可廉价克隆）
#[derive(Clone)]
pub struct AnalyticsService {
    tx: mpsc::Sender<AnalyticsEvent>,
}

impl std::fmt::Debug for AnalyticsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsService").finish_non_exhaustive()
    }
}

impl AnalyticsService {
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<AnalyticsEvent>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        (Self { tx }, rx)
    }

    /// 记录一次动作（fire-and-forget）
    pub fn record(&self, action: &'static str, data: Option<serde_json::Value>) {
        let event = AnalyticsEvent::new(action, data, Utc::now());
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = tx.send(event).await {
                        tracing::error!(action = e.0.action, "Analytics worker gone, event dropped");
                    }
                });
            }
            Err(TrySendError::Closed(event)) => {
                tracing::error!(action = event.action, "Analytics worker gone, event dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_counter_key_uses_utc_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        let event = AnalyticsEvent::new(actions::PRODUCT_CREATED, None, at);
        assert_eq!(event.date, "2024-03-09");
        assert_eq!(event.counter_key(), "2024-03-09_product_created");
        assert_eq!(event.timestamp, at.timestamp_millis());
    }

    #[tokio::test]
    async fn test_record_delivers_payload() {
        let (service, mut rx) = AnalyticsService::new(8);
        service.record(
            actions::BULK_PRODUCTS_CREATED,
            Some(serde_json::json!({"count": 3})),
        );
        let event = rx.recv().await.unwrap();
        assert_eq!(event.action, "bulk_products_created");
        assert_eq!(event.data, Some(serde_json::json!({"count": 3})));
    }
}
