//! Feed 事件处理器（FeedHandler）
//!
//! 每种事件类型一个处理器，负责：
//! - 写：从扩展字段中提取必需的 key，决定写收件箱还是发件箱；
//! - 读：为某个用户取出该类型 `created_at < before` 的至多 `limit` 条事件，按时间倒序。
//!
use crate::error::FeedResult;
use crate::ext::ExtendFields;
use crate::feed_event::{EventKind, FeedEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait FeedHandler: Send + Sync {
    /// 该处理器负责的事件类型
    fn kind(&self) -> EventKind;

    /// 为一个新事件产生存储写入
    async fn create_feed_event(&self, ext: &ExtendFields) -> FeedResult<()>;

    /// 取出 `uid` 可见的该类型事件
    async fn find_feed_events(
        &self,
        uid: i64,
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>>;
}
