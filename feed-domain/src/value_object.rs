//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑。
//!
use crate::error::{FeedError, FeedResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 时间线分页查询
///
/// 取 `uid` 可见的、`created_at < before` 的至多 `limit` 条事件。
/// 下一页以上一页最后一条的 `created_at` 作为新的 `before`。
///
/// # 示例
///
/// ```
/// use chrono::Utc;
/// use feed_domain::value_object::{TimelineQuery, ValueObject};
///
/// let q = TimelineQuery::new(1, Utc::now(), 20);
/// assert!(q.validate().is_ok());
/// assert!(TimelineQuery::new(1, Utc::now(), 0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineQuery {
    uid: i64,
    before: DateTime<Utc>,
    limit: usize,
    max_limit: usize,
}

impl TimelineQuery {
    /// 默认单页上限
    pub const MAX_LIMIT: usize = 200;

    pub fn new(uid: i64, before: DateTime<Utc>, limit: usize) -> Self {
        Self {
            uid,
            before,
            limit,
            max_limit: Self::MAX_LIMIT,
        }
    }

    /// 指定单页上限
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit;
        self
    }

    pub fn uid(&self) -> i64 {
        self.uid
    }

    pub fn before(&self) -> DateTime<Utc> {
        self.before
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl ValueObject for TimelineQuery {
    type Error = FeedError;

    fn validate(&self) -> FeedResult<()> {
        if self.limit == 0 || self.limit > self.max_limit {
            return Err(FeedError::invalid_field(
                "limit",
                format!("limit must be within 1..={}, got {}", self.max_limit, self.limit),
            ));
        }
        Ok(())
    }
}
