//! 收发件箱持久化（persist）
//!
//! 推拉模型、收发件箱：
//! - 发件箱（Outbox，`feed_pull_events`）：按发件人存储，读时由粉丝主动拉取；
//! - 收件箱（Inbox，`feed_push_events`）：按收件人存储，写时即分发到位，读时单点查询。
//!
//! 两个日志均为只追加，行一旦写入即不可变；id 在两者之间全局唯一。
//! 该模块定义仓储协议与行模型，具体后端（内存、Postgres）按需装配。
//!
mod inmemory;
#[cfg(feature = "infra-sqlx")]
mod postgres;
mod repository;
mod row;

pub use inmemory::InMemoryFeedEventRepository;
#[cfg(feature = "infra-sqlx")]
pub use postgres::PgFeedEventRepository;
pub use repository::FeedEventRepository;
pub use row::{FeedEventRow, Mailbox};
