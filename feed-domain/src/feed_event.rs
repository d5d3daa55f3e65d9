//! Feed 事件（FeedEvent）与时间线合并
//!
//! 以 A 发表了一篇文章为例：
//! - 若写入发件箱（拉模型），`uid` 是 A 的 id；
//! - 若写入收件箱（推模型），`uid` 是 A 的某个粉丝的 id。
//!
use crate::error::FeedError;
use crate::ext::ExtendFields;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 内置的事件类型集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Article,
    Follow,
    Like,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Article, EventKind::Follow, EventKind::Like];

    /// 存储与传输使用的稳定标签
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventKind::Article => "article_event",
            EventKind::Follow => "follow_event",
            EventKind::Like => "like_event",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| FeedError::HandlerNotFound(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct FeedEvent {
    /// 存储层分配的 id，收发件箱共用一个序列
    #[builder(default)]
    id: i64,
    /// 收件人（收件箱）或发件人（发件箱）
    uid: i64,
    /// 事件类型标签，比如 `article_event`
    #[builder(into)]
    event_type: String,
    #[builder(default = Utc::now())]
    created_at: DateTime<Utc>,
    #[builder(default)]
    ext: ExtendFields,
}

impl FeedEvent {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn uid(&self) -> i64 {
        self.uid
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn ext(&self) -> &ExtendFields {
        &self.ext
    }

    pub fn into_ext(self) -> ExtendFields {
        self.ext
    }
}

/// 按时间倒序排序；时间相同则 id 大者在前
pub fn sort_newest_first(events: &mut [FeedEvent]) {
    events.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// 合并多个来源的事件：拼接、倒序排序后截取 `limit` 条
pub fn merge_timeline(sources: Vec<Vec<FeedEvent>>, limit: usize) -> Vec<FeedEvent> {
    let total = sources.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    for source in sources {
        merged.extend(source);
    }
    sort_newest_first(&mut merged);
    merged.truncate(limit);
    merged
}
