//! 业务事件处理器（EventHandler）
//!
use crate::{error::FeedResult, eventing::BusinessEvent};
use async_trait::async_trait;

#[async_trait]
pub trait EventHandler: Send + Sync {
    /// 处理器名称（用于日志）
    fn handler_name(&self) -> &str;

    /// 处理一条业务事件
    async fn handle(&self, event: &BusinessEvent) -> FeedResult<()>;
}
