use chrono::{DateTime, Utc};
use feed_domain::feed_event::FeedEvent;
use serde::Serialize;
use std::collections::HashMap;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口/外部系统序列化友好；
/// - 与领域模型解耦，避免将领域对象直接暴露到接口层。
pub trait Dto: Serialize + Send + Sync + 'static {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEventDto {
    pub id: i64,
    pub uid: i64,
    pub event_type: String,
    pub created_at: DateTime<Utc>,
    pub ext: HashMap<String, String>,
}

impl From<FeedEvent> for FeedEventDto {
    fn from(event: FeedEvent) -> Self {
        Self {
            id: event.id(),
            uid: event.uid(),
            event_type: event.event_type().to_string(),
            created_at: event.created_at(),
            ext: event.into_ext().into_inner(),
        }
    }
}

impl Dto for FeedEventDto {}

/// 一页时间线，按时间倒序
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimelineDto {
    pub events: Vec<FeedEventDto>,
}

impl TimelineDto {
    /// 下一页的游标：本页最后一条的时间
    pub fn next_before(&self) -> Option<DateTime<Utc>> {
        self.events.last().map(|e| e.created_at)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<FeedEvent>> for TimelineDto {
    fn from(events: Vec<FeedEvent>) -> Self {
        Self {
            events: events.into_iter().map(FeedEventDto::from).collect(),
        }
    }
}

impl Dto for TimelineDto {}
