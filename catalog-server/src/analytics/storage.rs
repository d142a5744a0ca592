//! 统计计数器存储
//!
//! 每个 (日期, 动作) 一条记录，由数据库在单条 UPSERT 内完成自增。

use super::service::AnalyticsEvent;
use crate::db::Storage;

const UPSERT_COUNTER: &str = "UPSERT type::thing('analytics', $key) SET \
     date = $date, action = $action, \
     count = (count OR 0) + 1, last_updated = $now, data = data OR [] \
     RETURN NONE";

const UPSERT_COUNTER_WITH_DATA: &str = "UPSERT type::thing('analytics', $key) SET \
     date = $date, action = $action, \
     count = (count OR 0) + 1, last_updated = $now, \
     data = array::append(data OR [], $data) \
     RETURN NONE";

#[derive(Clone)]
pub struct AnalyticsStorage {
    db: Storage,
}

impl AnalyticsStorage {
    pub fn new(db: Storage) -> Self {
        Self { db }
    }

    /// 当日计数器 +1，并追加附加数据
    pub async fn increment(&self, event: AnalyticsEvent) -> Result<(), surrealdb::Error> {
        let key = event.counter_key();
        let sql = if event.data.is_some() {
            UPSERT_COUNTER_WITH_DATA
        } else {
            UPSERT_COUNTER
        };

        let mut query = self
            .db
            .query(sql)
            .bind(("key", key))
            .bind(("date", event.date))
            .bind(("action", event.action))
            .bind(("now", event.timestamp));
        if let Some(data) = event.data {
            query = query.bind(("data", data));
        }
        query.await?.check()?;
        Ok(())
    }
}
