use crate::error::{FeedError, FeedResult};
use crate::ext::ExtendFields;
use crate::feed_event::{EventKind, FeedEvent, merge_timeline};
use crate::graph::SocialGraph;
use crate::handler::FeedHandler;
use crate::persist::FeedEventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// 文章事件的推拉配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleEventConfig {
    /// 粉丝数严格大于该值即视为大 V，走发件箱（拉模型）
    pub fanout_threshold: i64,
    /// 读时最多取多少个关注者的发件箱
    pub followee_limit: usize,
    /// 推模型下一次最多取多少个粉丝
    pub push_fanout_limit: usize,
}

impl ArticleEventConfig {
    /// 推模型要覆盖全部粉丝，单次拉取上限不得低于阈值
    pub fn validate(&self) -> FeedResult<()> {
        let limit = i64::try_from(self.push_fanout_limit).unwrap_or(i64::MAX);
        if limit < self.fanout_threshold {
            return Err(FeedError::invalid_field(
                "push_fanout_limit",
                format!(
                    "push_fanout_limit {} is below fanout_threshold {}",
                    self.push_fanout_limit, self.fanout_threshold
                ),
            ));
        }
        Ok(())
    }

    /// 推模型下取粉丝的数量，不少于当前粉丝数
    fn push_fetch_limit(&self, follower_count: i64) -> usize {
        usize::try_from(follower_count)
            .unwrap_or(0)
            .max(self.push_fanout_limit)
    }
}

impl Default for ArticleEventConfig {
    fn default() -> Self {
        Self {
            fanout_threshold: 4,
            followee_limit: 200,
            push_fanout_limit: 10_000,
        }
    }
}

/// 文章事件处理器
///
/// 写：大 V 写一条发件箱记录，小 V 给每个粉丝写一条收件箱记录（单次批量写入）。
/// 读：事件可能在自己的收件箱，也可能在关注者的发件箱，两路并发查询后合并。
pub struct ArticleEventHandler {
    repo: Arc<dyn FeedEventRepository>,
    graph: Arc<dyn SocialGraph>,
    config: ArticleEventConfig,
}

impl ArticleEventHandler {
    pub fn new(
        repo: Arc<dyn FeedEventRepository>,
        graph: Arc<dyn SocialGraph>,
        config: ArticleEventConfig,
    ) -> Self {
        Self {
            repo,
            graph,
            config,
        }
    }

    async fn find_followee_outboxes(
        &self,
        uid: i64,
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>> {
        let followees = self.graph.followees(uid, self.config.followee_limit).await?;
        if followees.is_empty() {
            return Ok(Vec::new());
        }
        self.repo
            .find_pull_events(EventKind::Article.as_str(), &followees, before, limit)
            .await
    }
}

#[async_trait]
impl FeedHandler for ArticleEventHandler {
    fn kind(&self) -> EventKind {
        EventKind::Article
    }

    async fn create_feed_event(&self, ext: &ExtendFields) -> FeedResult<()> {
        let uid = ext.get("uid").as_i64()?;
        let follower_count = self.graph.follower_count(uid).await?;
        let created_at = Utc::now();

        if follower_count > self.config.fanout_threshold {
            debug!(
                uid,
                follower_count,
                threshold = self.config.fanout_threshold,
                "hub account, writing article to outbox"
            );
            let event = FeedEvent::builder()
                .uid(uid)
                .event_type(EventKind::Article.as_str())
                .created_at(created_at)
                .ext(ext.clone())
                .build();
            return self.repo.create_pull_event(event).await;
        }

        let followers = self
            .graph
            .followers(uid, self.config.push_fetch_limit(follower_count))
            .await?;
        debug!(
            uid,
            follower_count,
            threshold = self.config.fanout_threshold,
            recipients = followers.len(),
            "fanning article out to follower inboxes"
        );
        let events = followers
            .into_iter()
            .map(|follower| {
                FeedEvent::builder()
                    .uid(follower)
                    .event_type(EventKind::Article.as_str())
                    .created_at(created_at)
                    .ext(ext.clone())
                    .build()
            })
            .collect();
        self.repo.create_push_events(events).await
    }

    async fn find_feed_events(
        &self,
        uid: i64,
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>> {
        let inbox = self
            .repo
            .find_push_events(EventKind::Article.as_str(), uid, before, limit);
        let outbox = self.find_followee_outboxes(uid, before, limit);

        let (inbox, outbox) = tokio::try_join!(inbox, outbox)?;
        debug!(
            uid,
            inbox = inbox.len(),
            outbox = outbox.len(),
            "merged article sources"
        );
        Ok(merge_timeline(vec![inbox, outbox], limit))
    }
}
