//! 内存版收发件箱（InMemoryFeedEventRepository）
//!
//! 基于 `tokio::sync::RwLock` 的轻量实现，满足 `FeedEventRepository` 协议，
//! 典型用途：测试环境、示例与本地开发。
//!
use super::row::cursor_millis;
use super::{FeedEventRepository, FeedEventRow, Mailbox};
use crate::{error::FeedResult, feed_event::FeedEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryFeedEventRepository {
    inbox: RwLock<Vec<FeedEventRow>>,
    outbox: RwLock<Vec<FeedEventRow>>,
    // 收发件箱共用一个 id 序列
    next_id: AtomicI64,
}

impl InMemoryFeedEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接追加一行（用于模拟历史/损坏数据），返回分配的 id
    pub async fn insert_raw(&self, mailbox: Mailbox, mut row: FeedEventRow) -> i64 {
        row.id = self.allocate_id();
        let id = row.id;
        self.table(mailbox).write().await.push(row);
        id
    }

    /// 某个信箱当前的全部行
    pub async fn rows(&self, mailbox: Mailbox) -> Vec<FeedEventRow> {
        self.table(mailbox).read().await.clone()
    }

    fn table(&self, mailbox: Mailbox) -> &RwLock<Vec<FeedEventRow>> {
        match mailbox {
            Mailbox::Inbox => &self.inbox,
            Mailbox::Outbox => &self.outbox,
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn to_row(&self, event: &FeedEvent) -> FeedResult<FeedEventRow> {
        let mut row = FeedEventRow::from_event(event)?;
        row.id = self.allocate_id();
        Ok(row)
    }

    async fn scan(
        &self,
        mailbox: Mailbox,
        event_type: &str,
        owns: impl Fn(i64) -> bool,
        before: DateTime<Utc>,
        limit: usize,
    ) -> Vec<FeedEvent> {
        let before = cursor_millis(before);
        let mut rows: Vec<FeedEventRow> = self
            .table(mailbox)
            .read()
            .await
            .iter()
            .filter(|r| r.event_type == event_type && r.ctime < before && owns(r.uid))
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.ctime.cmp(&a.ctime).then_with(|| b.id.cmp(&a.id)));
        rows.truncate(limit);
        rows.into_iter().map(FeedEventRow::into_event).collect()
    }
}

#[async_trait]
impl FeedEventRepository for InMemoryFeedEventRepository {
    async fn create_push_events(&self, events: Vec<FeedEvent>) -> FeedResult<()> {
        // 先整体转换，任何一行失败都不落盘
        let rows = events
            .iter()
            .map(|e| self.to_row(e))
            .collect::<FeedResult<Vec<_>>>()?;

        self.inbox.write().await.extend(rows);
        Ok(())
    }

    async fn create_pull_event(&self, event: FeedEvent) -> FeedResult<()> {
        let row = self.to_row(&event)?;
        self.outbox.write().await.push(row);
        Ok(())
    }

    async fn find_pull_events(
        &self,
        event_type: &str,
        uids: &[i64],
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>> {
        Ok(self
            .scan(Mailbox::Outbox, event_type, |uid| uids.contains(&uid), before, limit)
            .await)
    }

    async fn find_push_events(
        &self,
        event_type: &str,
        uid: i64,
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>> {
        Ok(self
            .scan(Mailbox::Inbox, event_type, |owner| owner == uid, before, limit)
            .await)
    }
}
