//! Feed 流领域层基础库（feed-domain）
//!
//! 提供推拉结合的 feed 流写读核心：
//! - Feed 事件与扩展字段（`feed_event`、`ext`）
//! - 收发件箱仓储协议与内存/Postgres 实现（`persist`）
//! - 社交关系协作方协议（`graph`）
//! - 事件处理器协议、注册表与内置处理器（`handler`、`registry`、`handlers`）
//! - 事件接入：总线与消费循环（`eventing`）
//! - 时间线查询值对象（`value_object`）
//!
//! 写：按事件类型找到处理器，由处理器决定写收件箱（推）还是发件箱（拉）。
//! 读：并发调用全部处理器，按时间倒序合并后裁剪到单页大小。
//!
//! 编排（超时、并发汇聚、命令/查询入口）由 `feed-application` 提供。
//!
pub mod error;
#[cfg(feature = "eventing")]
pub mod eventing;
pub mod ext;
pub mod feed_event;
pub mod graph;
pub mod handler;
pub mod handlers;
pub mod persist;
pub mod registry;
pub mod value_object;
