//! 内存版事件总线（InMemoryEventBus）
//!
//! 基于 `tokio::sync::broadcast`，用于测试、示例与本地开发：
//! - 没有订阅者时发布的事件直接丢弃；
//! - 订阅者落后超过缓冲区容量时，流里出现一条 `EventBus` 错误，之后从最新位置继续。
//!
use crate::error::{FeedError, FeedResult as Result};
use crate::eventing::{BusinessEvent, EventBus};
use async_trait::async_trait;
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

#[derive(Clone)]
pub struct InMemoryEventBus {
    tx: broadcast::Sender<BusinessEvent>,
}

impl InMemoryEventBus {
    /// `capacity` 为广播缓冲区容量
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn send(&self, event: &BusinessEvent) {
        if self.tx.send(event.clone()).is_err() {
            debug!(event_type = %event.event_type, "no subscriber, business event dropped");
        }
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: &BusinessEvent) -> Result<()> {
        self.send(event);
        Ok(())
    }

    async fn publish_batch(&self, events: &[BusinessEvent]) -> Result<()> {
        for event in events {
            self.send(event);
        }
        debug!(
            events = events.len(),
            subscribers = self.subscriber_count(),
            "business events published"
        );
        Ok(())
    }

    async fn subscribe(&self) -> BoxStream<'static, Result<BusinessEvent>> {
        let stream = BroadcastStream::new(self.tx.subscribe())
            .map(|r| r.map_err(|e| FeedError::event_bus(format!("subscriber {e}"))));
        Box::pin(stream)
    }
}
