use feed_domain::error::FeedError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] FeedError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("timeout: operation={operation}, timeout_ms={timeout_ms}")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("infra: {0}")]
    Infra(String),

    #[error("config: key={key}, reason={reason}")]
    Config { key: &'static str, reason: String },
}

/// 面向调用方的错误分类，由传输层映射为各自的状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    HandlerNotFound,
    MissingOrInvalidField,
    CollaboratorUnavailable,
    Timeout,
    Validation,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(FeedError::HandlerNotFound(_)) => ErrorKind::HandlerNotFound,
            AppError::Domain(FeedError::MissingOrInvalidField { .. }) => {
                ErrorKind::MissingOrInvalidField
            }
            AppError::Domain(FeedError::CollaboratorUnavailable { .. }) => {
                ErrorKind::CollaboratorUnavailable
            }
            AppError::Domain(_) => ErrorKind::Internal,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            AppError::Infra(_) | AppError::Config { .. } => ErrorKind::Internal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::CollaboratorUnavailable | ErrorKind::Timeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_domain_taxonomy() {
        let not_found: AppError = FeedError::HandlerNotFound("x".into()).into();
        assert_eq!(not_found.kind(), ErrorKind::HandlerNotFound);
        assert!(!not_found.is_retryable());

        let field: AppError = FeedError::missing_field("uid").into();
        assert_eq!(field.kind(), ErrorKind::MissingOrInvalidField);

        let store: AppError = FeedError::store("down").into();
        assert_eq!(store.kind(), ErrorKind::CollaboratorUnavailable);
        assert!(store.is_retryable());

        let timeout = AppError::Timeout {
            operation: "get_timeline",
            timeout_ms: 10,
        };
        assert_eq!(timeout.kind(), ErrorKind::Timeout);
        assert!(timeout.is_retryable());
    }
}
