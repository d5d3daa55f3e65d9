//! 收发件箱仓储协议
//!
use crate::{error::FeedResult, feed_event::FeedEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[async_trait]
pub trait FeedEventRepository: Send + Sync {
    /// 批量写入收件箱；要么全部成功，要么全部失败
    async fn create_push_events(&self, events: Vec<FeedEvent>) -> FeedResult<()>;

    /// 写入发件箱
    async fn create_pull_event(&self, event: FeedEvent) -> FeedResult<()>;

    /// 查询若干发件人在发件箱中某类型的事件，`created_at < before`，按时间倒序
    async fn find_pull_events(
        &self,
        event_type: &str,
        uids: &[i64],
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>>;

    /// 查询某个收件人收件箱中某类型的事件，`created_at < before`，按时间倒序
    async fn find_push_events(
        &self,
        event_type: &str,
        uid: i64,
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>>;
}

#[async_trait]
impl<T> FeedEventRepository for Arc<T>
where
    T: FeedEventRepository + ?Sized,
{
    async fn create_push_events(&self, events: Vec<FeedEvent>) -> FeedResult<()> {
        (**self).create_push_events(events).await
    }

    async fn create_pull_event(&self, event: FeedEvent) -> FeedResult<()> {
        (**self).create_pull_event(event).await
    }

    async fn find_pull_events(
        &self,
        event_type: &str,
        uids: &[i64],
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>> {
        (**self)
            .find_pull_events(event_type, uids, before, limit)
            .await
    }

    async fn find_push_events(
        &self,
        event_type: &str,
        uid: i64,
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>> {
        (**self)
            .find_push_events(event_type, uid, before, limit)
            .await
    }
}
