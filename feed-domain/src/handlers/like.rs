use crate::error::FeedResult;
use crate::ext::ExtendFields;
use crate::feed_event::{EventKind, FeedEvent};
use crate::handler::FeedHandler;
use crate::persist::FeedEventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 点赞事件处理器：只写被点赞者的收件箱
pub struct LikeEventHandler {
    repo: Arc<dyn FeedEventRepository>,
}

impl LikeEventHandler {
    pub fn new(repo: Arc<dyn FeedEventRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl FeedHandler for LikeEventHandler {
    fn kind(&self) -> EventKind {
        EventKind::Like
    }

    /// ext 里面至少需要：
    /// - liked int64：被点赞的人
    /// - liker int64：点赞的人
    /// - bizId int64：被点赞的东西
    /// - biz string：业务类型，比如 article、comment、video
    ///
    /// 只有 `liked` 会被解析，其余原样携带。
    async fn create_feed_event(&self, ext: &ExtendFields) -> FeedResult<()> {
        let liked = ext.get("liked").as_i64()?;
        let event = FeedEvent::builder()
            .uid(liked)
            .event_type(EventKind::Like.as_str())
            .ext(ext.clone())
            .build();
        self.repo.create_push_events(vec![event]).await
    }

    async fn find_feed_events(
        &self,
        uid: i64,
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>> {
        self.repo
            .find_push_events(EventKind::Like.as_str(), uid, before, limit)
            .await
    }
}
