use crate::dto::{Dto, TimelineDto};
use chrono::{DateTime, Utc};

/// 应用层查询（Query）
///
/// 表达只读意图，不改变领域状态。
/// - 结果返回 [`Dto`](crate::dto::Dto)；
/// - 与 [`Command`](crate::command::Command) 相对，`Query` 应避免副作用。
pub trait Query: Send + Sync + 'static {
    /// 查询的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 查询返回的数据传输对象
    type Dto: Dto;
}

/// 取某个用户的一页时间线
///
/// `before` 为空时取当前时间，`limit` 为空时使用默认页大小。
#[derive(Debug, Clone, Copy, Default)]
pub struct GetTimeline {
    pub uid: i64,
    pub before: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl GetTimeline {
    pub fn new(uid: i64) -> Self {
        Self {
            uid,
            ..Default::default()
        }
    }

    pub fn before(mut self, before: DateTime<Utc>) -> Self {
        self.before = Some(before);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Query for GetTimeline {
    const NAME: &'static str = "GetTimeline";
    type Dto = TimelineDto;
}
