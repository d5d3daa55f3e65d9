use crate::error::FeedResult;
use crate::ext::ExtendFields;
use crate::feed_event::{EventKind, FeedEvent};
use crate::handler::FeedHandler;
use crate::persist::FeedEventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 关注事件处理器：只写被关注者的收件箱
///
/// ext 中需要：
/// - followee int64：被关注的人
/// - follower int64：关注的人（原样携带）
pub struct FollowEventHandler {
    repo: Arc<dyn FeedEventRepository>,
}

impl FollowEventHandler {
    pub fn new(repo: Arc<dyn FeedEventRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl FeedHandler for FollowEventHandler {
    fn kind(&self) -> EventKind {
        EventKind::Follow
    }

    async fn create_feed_event(&self, ext: &ExtendFields) -> FeedResult<()> {
        let followee = ext.get("followee").as_i64()?;
        let event = FeedEvent::builder()
            .uid(followee)
            .event_type(EventKind::Follow.as_str())
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
            .find_push_events(EventKind::Follow.as_str(), uid, before, limit)
            .await
    }
}
