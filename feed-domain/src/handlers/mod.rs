//! 内置的事件处理器
//!
//! - 文章（`article_event`）：按发布者粉丝数在推/拉模型之间选择，读时聚合收件箱与关注者的发件箱；
//! - 关注（`follow_event`）：写入被关注者的收件箱；
//! - 点赞（`like_event`）：写入被点赞者的收件箱。
//!
mod article;
mod follow;
mod like;

pub use article::{ArticleEventConfig, ArticleEventHandler};
pub use follow::FollowEventHandler;
pub use like::LikeEventHandler;
