//! 收发件箱的行模型（FeedEventRow）
//!
use crate::{error::FeedResult, ext::ExtendFields, feed_event::FeedEvent};
use chrono::{DateTime, TimeZone, Utc};

/// 事件落在哪个信箱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mailbox {
    /// 收件箱（推模型）
    Inbox,
    /// 发件箱（拉模型）
    Outbox,
}

impl Mailbox {
    pub const fn table_name(&self) -> &'static str {
        match self {
            Mailbox::Inbox => "feed_push_events",
            Mailbox::Outbox => "feed_pull_events",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "infra-sqlx", derive(sqlx::FromRow))]
pub struct FeedEventRow {
    pub id: i64,
    /// 收件箱为收件人，发件箱为发件人
    pub uid: i64,
    pub event_type: String,
    /// 序列化后的扩展字段
    pub content: String,
    /// 创建时间（unix 毫秒）
    pub ctime: i64,
}

impl FeedEventRow {
    pub fn from_event(event: &FeedEvent) -> FeedResult<Self> {
        Ok(Self {
            id: event.id(),
            uid: event.uid(),
            event_type: event.event_type().to_string(),
            content: event.ext().to_content()?,
            ctime: event.created_at().timestamp_millis(),
        })
    }

    pub fn into_event(self) -> FeedEvent {
        FeedEvent::builder()
            .id(self.id)
            .uid(self.uid)
            .event_type(self.event_type)
            .created_at(from_millis(self.ctime))
            .ext(ExtendFields::from_content(&self.content))
            .build()
    }
}

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    match Utc.timestamp_millis_opt(ms).single() {
        Some(at) => at,
        None => {
            tracing::warn!(ctime = ms, "tolerating out-of-range feed event ctime");
            DateTime::default()
        }
    }
}

/// 查询游标换算为毫秒
///
/// `ctime` 存储时向下取整到毫秒；游标带亚毫秒部分时向上取整，
/// 让同一毫秒内已写入的事件仍满足 `ctime < before`。
pub(crate) fn cursor_millis(before: DateTime<Utc>) -> i64 {
    let ms = before.timestamp_millis();
    if before.timestamp_subsec_nanos() % 1_000_000 == 0 {
        ms
    } else {
        ms.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed_event::EventKind;

    #[test]
    fn row_keeps_millisecond_precision() {
        let created_at = from_millis(1_700_000_000_123);
        let event = FeedEvent::builder()
            .uid(7)
            .event_type(EventKind::Article.as_str())
            .created_at(created_at)
            .ext(ExtendFields::new().with("uid", "7"))
            .build();

        let row = FeedEventRow::from_event(&event).unwrap();
        assert_eq!(row.ctime, 1_700_000_000_123);
        assert_eq!(row.into_event(), event);
    }

    #[test]
    fn corrupt_content_reads_back_as_empty_ext() {
        let row = FeedEventRow {
            id: 3,
            uid: 1,
            event_type: EventKind::Like.as_str().to_string(),
            content: "<<legacy>>".to_string(),
            ctime: 1_000,
        };
        let event = row.into_event();
        assert_eq!(event.id(), 3);
        assert!(event.ext().is_empty());
    }

    #[test]
    fn out_of_range_ctime_degrades_to_epoch() {
        assert_eq!(from_millis(i64::MAX), DateTime::<Utc>::default());
    }

    #[test]
    fn sub_millisecond_cursor_rounds_up() {
        let whole = from_millis(1_700_000_000_123);
        assert_eq!(cursor_millis(whole), 1_700_000_000_123);
        assert_eq!(
            cursor_millis(whole + chrono::Duration::nanoseconds(1)),
            1_700_000_000_124
        );
        assert_eq!(
            cursor_millis(whole + chrono::Duration::microseconds(999)),
            1_700_000_000_124
        );
    }
}
