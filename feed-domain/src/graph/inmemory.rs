use super::SocialGraph;
use crate::error::FeedResult;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

/// 内存版社交关系，双向维护关注/粉丝索引
#[derive(Debug, Default)]
pub struct InMemorySocialGraph {
    inner: RwLock<Relations>,
}

#[derive(Debug, Default)]
struct Relations {
    // followee -> followers
    followers: HashMap<i64, BTreeSet<i64>>,
    // follower -> followees
    followees: HashMap<i64, BTreeSet<i64>>,
}

impl InMemorySocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn follow(&self, follower: i64, followee: i64) {
        let mut g = self.inner.write().await;
        g.followers.entry(followee).or_default().insert(follower);
        g.followees.entry(follower).or_default().insert(followee);
    }

    pub async fn unfollow(&self, follower: i64, followee: i64) {
        let mut g = self.inner.write().await;
        if let Some(set) = g.followers.get_mut(&followee) {
            set.remove(&follower);
        }
        if let Some(set) = g.followees.get_mut(&follower) {
            set.remove(&followee);
        }
    }
}

fn take(index: &HashMap<i64, BTreeSet<i64>>, uid: i64, limit: usize) -> Vec<i64> {
    index
        .get(&uid)
        .map(|set| set.iter().copied().take(limit).collect())
        .unwrap_or_default()
}

#[async_trait]
impl SocialGraph for InMemorySocialGraph {
    async fn follower_count(&self, uid: i64) -> FeedResult<i64> {
        let g = self.inner.read().await;
        Ok(g.followers.get(&uid).map_or(0, |s| s.len() as i64))
    }

    async fn followers(&self, uid: i64, limit: usize) -> FeedResult<Vec<i64>> {
        Ok(take(&self.inner.read().await.followers, uid, limit))
    }

    async fn followees(&self, uid: i64, limit: usize) -> FeedResult<Vec<i64>> {
        Ok(take(&self.inner.read().await.followees, uid, limit))
    }
}
