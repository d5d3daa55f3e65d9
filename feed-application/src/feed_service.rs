//! Feed 服务（FeedService）
//!
//! 应用层入口，负责写入分发与读取聚合：
//! - 写：按事件类型找到处理器，由处理器决定推/拉；
//! - 读：所有处理器并发取同一页，各自返回结果后统一按时间倒序合并、截断。
//!
//! 写与读都在整体超时内完成；超时或任一处理器失败时，放弃剩余的子任务。
//!
use crate::command::{Command, CreateFeedEvent};
use crate::command_handler::CommandHandler;
use crate::config::FeedConfig;
use crate::context::AppContext;
use crate::dto::TimelineDto;
use crate::error::AppError;
use crate::query::{GetTimeline, Query};
use crate::query_handler::QueryHandler;
use async_trait::async_trait;
use chrono::Utc;
use feed_domain::error::{FeedError, FeedResult};
use feed_domain::eventing::{BusinessEvent, EventHandler};
use feed_domain::ext::ExtendFields;
use feed_domain::feed_event::{FeedEvent, merge_timeline};
use feed_domain::registry::HandlerRegistry;
use feed_domain::value_object::{TimelineQuery, ValueObject};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, instrument};

pub struct FeedService {
    registry: Arc<HandlerRegistry>,
    config: FeedConfig,
}

impl FeedService {
    pub fn new(registry: Arc<HandlerRegistry>, config: FeedConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// 记录一条新事件
    ///
    /// 未知类型与扩展字段缺失在写入任何数据之前失败。
    #[instrument(
        name = "feed.create_event",
        skip_all,
        fields(event_type = %event_type, request_id = ctx.request_id.as_deref())
    )]
    pub async fn create_event(
        &self,
        ctx: &AppContext,
        event_type: &str,
        ext: ExtendFields,
    ) -> Result<(), AppError> {
        let handler = self.registry.get(event_type)?;
        let timeout = ctx.timeout_or(self.config.write_timeout);

        match tokio::time::timeout(timeout, handler.create_feed_event(&ext)).await {
            Ok(res) => res.map_err(AppError::from),
            Err(_) => Err(AppError::Timeout {
                operation: "create_event",
                timeout_ms: millis(timeout),
            }),
        }
    }

    /// 取一页时间线
    #[instrument(
        name = "feed.get_timeline",
        skip_all,
        fields(uid = query.uid, limit = query.limit, request_id = ctx.request_id.as_deref())
    )]
    pub async fn get_timeline(
        &self,
        ctx: &AppContext,
        query: GetTimeline,
    ) -> Result<TimelineDto, AppError> {
        let page = TimelineQuery::new(
            query.uid,
            query.before.unwrap_or_else(Utc::now),
            query.limit.unwrap_or(self.config.default_page_size),
        )
        .with_max_limit(self.config.max_page_size);
        page.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let timeout = ctx.timeout_or(self.config.read_timeout);
        // 超时时 fan_in 的 future 被丢弃，JoinSet 随之中止全部子任务
        let events = tokio::time::timeout(timeout, self.fan_in(page))
            .await
            .map_err(|_| AppError::Timeout {
                operation: "get_timeline",
                timeout_ms: millis(timeout),
            })??;

        Ok(TimelineDto::from(events))
    }

    async fn fan_in(&self, page: TimelineQuery) -> Result<Vec<FeedEvent>, AppError> {
        let mut set = JoinSet::new();
        for handler in self.registry.handlers() {
            let handler = Arc::clone(handler);
            set.spawn(async move {
                let kind = handler.kind();
                handler
                    .find_feed_events(page.uid(), page.before(), page.limit())
                    .await
                    .map(|events| (kind, events))
            });
        }

        let mut sources = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            let (kind, events) = joined
                .map_err(|e| AppError::Infra(format!("timeline task failed: {e}")))??;
            debug!(event_type = %kind, found = events.len(), "handler page collected");
            sources.push(events);
        }

        Ok(merge_timeline(sources, page.limit()))
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl CommandHandler<CreateFeedEvent> for FeedService {
    async fn handle(&self, ctx: &AppContext, cmd: CreateFeedEvent) -> Result<(), AppError> {
        debug!(command = CreateFeedEvent::NAME, "handling command");
        self.create_event(ctx, &cmd.event_type, cmd.ext).await
    }
}

#[async_trait]
impl QueryHandler<GetTimeline> for FeedService {
    async fn handle(&self, ctx: &AppContext, q: GetTimeline) -> Result<TimelineDto, AppError> {
        debug!(query = GetTimeline::NAME, "handling query");
        self.get_timeline(ctx, q).await
    }
}

/// 将总线投递的业务事件接入写路径
#[async_trait]
impl EventHandler for FeedService {
    fn handler_name(&self) -> &str {
        "feed_service"
    }

    async fn handle(&self, event: &BusinessEvent) -> FeedResult<()> {
        match self
            .create_event(&AppContext::default(), &event.event_type, event.ext())
            .await
        {
            Ok(()) => Ok(()),
            Err(AppError::Domain(err)) => Err(err),
            Err(other) => Err(FeedError::event_bus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::DateTime;
    use feed_domain::feed_event::EventKind;
    use feed_domain::graph::InMemorySocialGraph;
    use feed_domain::handler::FeedHandler;
    use feed_domain::handlers::LikeEventHandler;
    use feed_domain::persist::{InMemoryFeedEventRepository, Mailbox};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// 先睡一会再返回一条事件；被中止时标记不会被设置
    struct SlowHandler {
        delay: Duration,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl FeedHandler for SlowHandler {
        fn kind(&self) -> EventKind {
            EventKind::Article
        }

        async fn create_feed_event(&self, _ext: &ExtendFields) -> FeedResult<()> {
            tokio::time::sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn find_feed_events(
            &self,
            uid: i64,
            before: DateTime<Utc>,
            _limit: usize,
        ) -> FeedResult<Vec<FeedEvent>> {
            tokio::time::sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(vec![
                FeedEvent::builder()
                    .id(1)
                    .uid(uid)
                    .event_type(EventKind::Article.as_str())
                    .created_at(before - chrono::Duration::seconds(1))
                    .build(),
            ])
        }
    }

    struct BrokenStoreHandler;

    #[async_trait]
    impl FeedHandler for BrokenStoreHandler {
        fn kind(&self) -> EventKind {
            EventKind::Follow
        }

        async fn create_feed_event(&self, _ext: &ExtendFields) -> FeedResult<()> {
            Err(FeedError::store("connection refused"))
        }

        async fn find_feed_events(
            &self,
            _uid: i64,
            _before: DateTime<Utc>,
            _limit: usize,
        ) -> FeedResult<Vec<FeedEvent>> {
            Err(FeedError::store("connection refused"))
        }
    }

    fn slow(delay: Duration) -> (Arc<SlowHandler>, Arc<AtomicBool>) {
        let finished = Arc::new(AtomicBool::new(false));
        (
            Arc::new(SlowHandler {
                delay,
                finished: finished.clone(),
            }),
            finished,
        )
    }

    fn service_with(handlers: Vec<Arc<dyn FeedHandler>>) -> FeedService {
        let mut builder = HandlerRegistry::builder();
        for h in handlers {
            builder = builder.register(h).unwrap();
        }
        FeedService::new(Arc::new(builder.build()), FeedConfig::default())
    }

    fn in_memory() -> (FeedService, Arc<InMemoryFeedEventRepository>) {
        let repo = Arc::new(InMemoryFeedEventRepository::new());
        let graph = Arc::new(InMemorySocialGraph::new());
        let registry =
            HandlerRegistry::with_defaults(repo.clone(), graph, Default::default()).unwrap();
        (
            FeedService::new(Arc::new(registry), FeedConfig::default()),
            repo,
        )
    }

    async fn total_rows(repo: &InMemoryFeedEventRepository) -> usize {
        repo.rows(Mailbox::Inbox).await.len() + repo.rows(Mailbox::Outbox).await.len()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_type_writes_nothing() {
        let (svc, repo) = in_memory();
        let err = svc
            .create_event(
                &AppContext::default(),
                "nonexistent_type",
                ExtendFields::new().with("uid", "1"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HandlerNotFound);
        assert_eq!(total_rows(&repo).await, 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_extension_key_writes_nothing() {
        let (svc, repo) = in_memory();
        let err = svc
            .create_event(
                &AppContext::default(),
                EventKind::Like.as_str(),
                ExtendFields::new().with("liker", "10"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingOrInvalidField);
        assert_eq!(total_rows(&repo).await, 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn page_size_is_validated() {
        let (svc, _) = in_memory();
        for limit in [0, 201] {
            let err = svc
                .get_timeline(&AppContext::default(), GetTimeline::new(1).limit(limit))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn default_page_size_applies_when_limit_absent() {
        let (svc, _) = in_memory();
        for _ in 0..25 {
            svc.create_event(
                &AppContext::default(),
                EventKind::Like.as_str(),
                ExtendFields::new().with("liked", "1"),
            )
            .await
            .unwrap();
        }
        let page = svc
            .get_timeline(&AppContext::default(), GetTimeline::new(1))
            .await
            .unwrap();
        assert_eq!(page.len(), svc.config().default_page_size);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reads_see_writes_made_just_before() {
        let (svc, _) = in_memory();
        for round in 1..=50 {
            svc.create_event(
                &AppContext::default(),
                EventKind::Like.as_str(),
                ExtendFields::new().with("liked", "1"),
            )
            .await
            .unwrap();
            let page = svc
                .get_timeline(&AppContext::default(), GetTimeline::new(1).limit(100))
                .await
                .unwrap();
            assert_eq!(page.len(), round);
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn read_deadline_returns_timeout() {
        let (handler, finished) = slow(Duration::from_millis(500));
        let svc = service_with(vec![handler]);
        let ctx = AppContext::default().with_timeout(Duration::from_millis(30));

        let err = svc
            .get_timeline(&ctx, GetTimeline::new(1).limit(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Timeout {
                operation: "get_timeline",
                timeout_ms: 30
            }
        ));
        assert!(err.is_retryable());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!finished.load(Ordering::SeqCst), "child task should be aborted");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn write_deadline_returns_timeout() {
        let (handler, _) = slow(Duration::from_millis(500));
        let svc = service_with(vec![handler]);
        let ctx = AppContext::default().with_timeout(Duration::from_millis(20));

        let err = svc
            .create_event(&ctx, EventKind::Article.as_str(), ExtendFields::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn first_failure_aborts_the_remaining_handlers() {
        let (handler, finished) = slow(Duration::from_millis(200));
        let svc = service_with(vec![handler, Arc::new(BrokenStoreHandler)]);

        let err = svc
            .get_timeline(&AppContext::default(), GetTimeline::new(1).limit(10))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CollaboratorUnavailable);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!finished.load(Ordering::SeqCst), "child task should be aborted");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn business_events_drive_the_write_path() {
        let repo = Arc::new(InMemoryFeedEventRepository::new());
        let registry = HandlerRegistry::builder()
            .register(Arc::new(LikeEventHandler::new(repo.clone())))
            .unwrap()
            .build();
        let svc = FeedService::new(Arc::new(registry), FeedConfig::default());

        let evt = BusinessEvent::new(EventKind::Like.as_str(), ExtendFields::new().with("liked", "7"));
        EventHandler::handle(&svc, &evt).await.unwrap();

        let rows = repo.rows(Mailbox::Inbox).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].uid, 7);

        let unknown = BusinessEvent::new("nonexistent_type", ExtendFields::new());
        assert!(matches!(
            EventHandler::handle(&svc, &unknown).await,
            Err(FeedError::HandlerNotFound(_))
        ));
    }
}
