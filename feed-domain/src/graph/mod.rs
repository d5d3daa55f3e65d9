//! 社交关系协作方（SocialGraph）
//!
//! 写路径用粉丝数判定推/拉模型并获取粉丝列表，读路径用关注列表定位发件箱。
//! 核心不对这些调用做缓存或重试。
//!
mod inmemory;

pub use inmemory::InMemorySocialGraph;

use crate::error::FeedResult;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// 粉丝数量
    async fn follower_count(&self, uid: i64) -> FeedResult<i64>;

    /// 关注了 `uid` 的用户（粉丝）
    async fn followers(&self, uid: i64, limit: usize) -> FeedResult<Vec<i64>>;

    /// `uid` 关注的用户
    async fn followees(&self, uid: i64, limit: usize) -> FeedResult<Vec<i64>>;
}

#[async_trait]
impl<T> SocialGraph for Arc<T>
where
    T: SocialGraph + ?Sized,
{
    async fn follower_count(&self, uid: i64) -> FeedResult<i64> {
        (**self).follower_count(uid).await
    }

    async fn followers(&self, uid: i64, limit: usize) -> FeedResult<Vec<i64>> {
        (**self).followers(uid, limit).await
    }

    async fn followees(&self, uid: i64, limit: usize) -> FeedResult<Vec<i64>> {
        (**self).followees(uid, limit).await
    }
}
