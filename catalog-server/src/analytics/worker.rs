//! 统计后台 Worker

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::service::AnalyticsEvent;
use super::storage::AnalyticsStorage;

pub struct AnalyticsWorker {
    storage: AnalyticsStorage,
}

impl AnalyticsWorker {
    pub fn new(storage: AnalyticsStorage) -> Self {
        Self { storage }
    }

    /// 运行 worker；关闭时先写完队列中剩余事件
    pub async fn run(self, mut rx: mpsc::Receiver<AnalyticsEvent>, shutdown: CancellationToken) {
        tracing::info!("📈 Analytics worker started");

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => self.write(event).await,
                    None => break,
                },
                _ = shutdown.cancelled() => {
                    rx.close();
                    while let Some(event) = rx.recv().await {
                        self.write(event).await;
                    }
                    break;
                }
            }
        }

        tracing::info!("Analytics worker stopping");
    }

    async fn write(&self, event: AnalyticsEvent) {
        let action = event.action;
        if let Err(e) = self.storage.increment(event).await {
            tracing::error!(action, "Failed to update analytics counter: {e}");
        }
    }
}
