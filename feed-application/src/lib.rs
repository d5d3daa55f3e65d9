//! Feed 应用层
//!
//! 在领域层之上提供用例入口 `FeedService`（写入分发、时间线聚合），
//! 以及命令/查询、调用上下文、配置与错误分类。
//!
pub mod command;
pub mod command_handler;
pub mod config;
pub mod context;
pub mod dto;
pub mod error;
pub mod feed_service;
pub mod query;
pub mod query_handler;

pub use config::FeedConfig;
pub use context::AppContext;
pub use error::{AppError, ErrorKind};
pub use feed_service::FeedService;
