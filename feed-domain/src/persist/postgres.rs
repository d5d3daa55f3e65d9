//! Postgres 版收发件箱（PgFeedEventRepository）
//!
//! 两张表共用 `feed_event_id_seq` 序列，保证 id 在收发件箱之间全局唯一。
//! 推模型的批量写入按块拆成多值 INSERT，在同一事务内完成，失败时整体回滚。
//!
use super::row::cursor_millis;
use super::{FeedEventRepository, FeedEventRow, Mailbox};
use crate::{error::FeedResult, feed_event::FeedEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

const SCHEMA: &[&str] = &[
    "CREATE SEQUENCE IF NOT EXISTS feed_event_id_seq",
    r#"
    CREATE TABLE IF NOT EXISTS feed_pull_events (
        id      BIGINT PRIMARY KEY DEFAULT nextval('feed_event_id_seq'),
        uid     BIGINT NOT NULL,
        type    TEXT   NOT NULL,
        content TEXT   NOT NULL,
        ctime   BIGINT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feed_push_events (
        id      BIGINT PRIMARY KEY DEFAULT nextval('feed_event_id_seq'),
        uid     BIGINT NOT NULL,
        type    TEXT   NOT NULL,
        content TEXT   NOT NULL,
        ctime   BIGINT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_feed_pull_events_uid_type_ctime ON feed_pull_events (uid, type, ctime DESC)",
    "CREATE INDEX IF NOT EXISTS idx_feed_push_events_uid_type_ctime ON feed_push_events (uid, type, ctime DESC)",
];

// 每行 4 个绑定参数，Postgres 单条语句最多 65535 个
const INSERT_CHUNK_ROWS: usize = 4_096;

#[derive(Clone)]
pub struct PgFeedEventRepository {
    pool: PgPool,
}

impl PgFeedEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 建表（幂等）
    pub async fn ensure_schema(&self) -> FeedResult<()> {
        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn insert_builder(mailbox: Mailbox, rows: &[FeedEventRow]) -> QueryBuilder<'_, Postgres> {
        let mut qb = QueryBuilder::new(format!(
            "INSERT INTO {} (uid, type, content, ctime) ",
            mailbox.table_name()
        ));
        qb.push_values(rows, |mut b, row| {
            b.push_bind(row.uid)
                .push_bind(&row.event_type)
                .push_bind(&row.content)
                .push_bind(row.ctime);
        });
        qb
    }
}

#[async_trait]
impl FeedEventRepository for PgFeedEventRepository {
    async fn create_push_events(&self, events: Vec<FeedEvent>) -> FeedResult<()> {
        if events.is_empty() {
            return Ok(());
        }

        let rows = events
            .iter()
            .map(FeedEventRow::from_event)
            .collect::<FeedResult<Vec<_>>>()?;

        let mut tx = self.pool.begin().await?;
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            Self::insert_builder(Mailbox::Inbox, chunk)
                .build()
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn create_pull_event(&self, event: FeedEvent) -> FeedResult<()> {
        let row = FeedEventRow::from_event(&event)?;

        sqlx::query(
            r#"
            INSERT INTO feed_pull_events (uid, type, content, ctime)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(row.uid)
        .bind(&row.event_type)
        .bind(&row.content)
        .bind(row.ctime)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_pull_events(
        &self,
        event_type: &str,
        uids: &[i64],
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, FeedEventRow>(
            r#"
            SELECT id, uid, type AS event_type, content, ctime
            FROM feed_pull_events
            WHERE uid = ANY($1) AND type = $2 AND ctime < $3
            ORDER BY ctime DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(uids)
        .bind(event_type)
        .bind(cursor_millis(before))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedEventRow::into_event).collect())
    }

    async fn find_push_events(
        &self,
        event_type: &str,
        uid: i64,
        before: DateTime<Utc>,
        limit: usize,
    ) -> FeedResult<Vec<FeedEvent>> {
        let rows = sqlx::query_as::<_, FeedEventRow>(
            r#"
            SELECT id, uid, type AS event_type, content, ctime
            FROM feed_push_events
            WHERE uid = $1 AND type = $2 AND ctime < $3
            ORDER BY ctime DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(uid)
        .bind(event_type)
        .bind(cursor_millis(before))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FeedEventRow::into_event).collect())
    }
}
