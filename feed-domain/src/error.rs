//! 领域层统一错误定义
//!
//! 聚焦处理器分发、扩展字段提取、外部协作方（存储/社交关系）与事件接入的最小必要集合，
//! 便于在各实现层统一转换为 `FeedError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FeedError {
    // --- 分发/注册 ---
    #[error("handler not found: {0}")]
    HandlerNotFound(String),
    #[error("handler already registered: {0}")]
    AlreadyRegistered(String),

    // --- 扩展字段 ---
    #[error("missing or invalid field: key={key}, reason={reason}")]
    MissingOrInvalidField { key: String, reason: String },

    // --- 外部协作方（存储、社交关系服务） ---
    #[error("collaborator unavailable: collaborator={collaborator}, reason={reason}")]
    CollaboratorUnavailable {
        collaborator: &'static str,
        reason: String,
    },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    // --- 事件接入 ---
    #[error("event bus error: {reason}")]
    EventBus { reason: String },
}

/// 统一 Result 类型别名
pub type FeedResult<T> = Result<T, FeedError>;

impl FeedError {
    pub fn missing_field(key: impl Into<String>) -> Self {
        let key = key.into();
        FeedError::MissingOrInvalidField {
            reason: format!("field `{key}` is absent"),
            key,
        }
    }

    pub fn invalid_field(key: impl Into<String>, reason: impl Into<String>) -> Self {
        FeedError::MissingOrInvalidField {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn store(reason: impl Into<String>) -> Self {
        FeedError::CollaboratorUnavailable {
            collaborator: "store",
            reason: reason.into(),
        }
    }

    pub fn social_graph(reason: impl Into<String>) -> Self {
        FeedError::CollaboratorUnavailable {
            collaborator: "social_graph",
            reason: reason.into(),
        }
    }

    pub fn event_bus(reason: impl Into<String>) -> Self {
        FeedError::EventBus {
            reason: reason.into(),
        }
    }

    /// 仅外部协作方的失败值得调用方重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, FeedError::CollaboratorUnavailable { .. })
    }
}

// ---- Cross-crate conversions for infrastructure convenience ----
// 允许在基础设施层直接使用 `?` 将 sqlx 错误转换为 FeedError

#[cfg(feature = "infra-sqlx")]
impl From<sqlx::Error> for FeedError {
    fn from(err: sqlx::Error) -> Self {
        FeedError::store(err.to_string())
    }
}
