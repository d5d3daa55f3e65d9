//! 事件消费循环（EventConsumer）
//!
//! 订阅总线事件流，逐条交给处理器；每条消息有独立的超时。
//! 处理失败、超时或总线错误只记录日志，循环继续（至少一次投递，不做去重）。
//! 提供关闭与等待的 `ConsumerHandle`。
//!
use super::{EventBus, EventHandler};
use bon::Builder;
use futures_util::StreamExt;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Builder)]
pub struct EventConsumer {
    event_bus: Arc<dyn EventBus>,
    handler: Arc<dyn EventHandler>,
    #[builder(default)]
    config: EventConsumerConfig,
}

impl EventConsumer {
    /// 启动消费循环，返回可用于关闭/等待的句柄
    pub fn start(self: Arc<Self>) -> ConsumerHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(Self::consume_loop(self, token.clone()));
        ConsumerHandle {
            token,
            task: Some(task),
        }
    }

    async fn consume_loop(self: Arc<Self>, token: CancellationToken) {
        let mut stream = self.event_bus.subscribe().await;
        let timeout = self.config.message_timeout;
        info!(handler = self.handler.handler_name(), "event consumer started");

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    break;
                }
                maybe_event = stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            match tokio::time::timeout(timeout, self.handler.handle(&event)).await {
                                Ok(Ok(())) => {}
                                Ok(Err(err)) => {
                                    error!(
                                        handler = self.handler.handler_name(),
                                        event_type = %event.event_type,
                                        error = %err,
                                        "failed to handle business event"
                                    );
                                }
                                Err(_) => {
                                    error!(
                                        handler = self.handler.handler_name(),
                                        event_type = %event.event_type,
                                        timeout_ms = timeout.as_millis() as u64,
                                        "business event handling timed out"
                                    );
                                }
                            }
                        }
                        Some(Err(err)) => {
                            warn!(error = %err, "event bus error, skipping");
                        }
                        None => {
                            break;
                        }
                    }
                }
            }
        }

        info!(handler = self.handler.handler_name(), "event consumer stopped");
    }
}

/// 消费循环配置
#[derive(Clone, Copy, Debug)]
pub struct EventConsumerConfig {
    /// 单条消息的处理超时
    pub message_timeout: Duration,
}

impl Default for EventConsumerConfig {
    fn default() -> Self {
        Self {
            message_timeout: Duration::from_secs(1),
        }
    }
}

/// 消费循环句柄：用于优雅关闭与等待任务结束
pub struct ConsumerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ConsumerHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
