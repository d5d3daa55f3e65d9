//! 处理器注册表（HandlerRegistry）
//!
//! 启动时构建一次，之后只读共享；写入按事件类型查找单个处理器，
//! 读取遍历全部处理器。
//!
use crate::error::{FeedError, FeedResult};
use crate::feed_event::EventKind;
use crate::graph::SocialGraph;
use crate::handler::FeedHandler;
use crate::handlers::{ArticleEventConfig, ArticleEventHandler, FollowEventHandler, LikeEventHandler};
use crate::persist::FeedEventRepository;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct HandlerRegistry {
    by_kind: HashMap<EventKind, Arc<dyn FeedHandler>>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// 注册内置的文章、关注、点赞三个处理器
    pub fn with_defaults(
        repo: Arc<dyn FeedEventRepository>,
        graph: Arc<dyn SocialGraph>,
        article: ArticleEventConfig,
    ) -> FeedResult<Self> {
        Self::builder()
            .register(Arc::new(ArticleEventHandler::new(
                repo.clone(),
                graph,
                article,
            )))?
            .register(Arc::new(FollowEventHandler::new(repo.clone())))?
            .register(Arc::new(LikeEventHandler::new(repo)))
            .map(HandlerRegistryBuilder::build)
    }

    /// 按事件类型标签查找处理器
    pub fn get(&self, event_type: &str) -> FeedResult<Arc<dyn FeedHandler>> {
        let kind: EventKind = event_type.parse()?;
        self.by_kind
            .get(&kind)
            .cloned()
            .ok_or_else(|| FeedError::HandlerNotFound(event_type.to_string()))
    }

    /// 全部已注册的处理器
    pub fn handlers(&self) -> impl Iterator<Item = &Arc<dyn FeedHandler>> {
        self.by_kind.values()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = self.by_kind.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

#[derive(Default)]
pub struct HandlerRegistryBuilder {
    by_kind: HashMap<EventKind, Arc<dyn FeedHandler>>,
}

impl HandlerRegistryBuilder {
    pub fn register(mut self, handler: Arc<dyn FeedHandler>) -> FeedResult<Self> {
        let kind = handler.kind();
        if self.by_kind.contains_key(&kind) {
            return Err(FeedError::AlreadyRegistered(kind.as_str().to_string()));
        }
        self.by_kind.insert(kind, handler);
        Ok(self)
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            by_kind: self.by_kind,
        }
    }
}
