use std::time::Duration;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询）所需的横切信息：
/// - 请求 ID（`request_id`）：用于日志关联；
/// - 超时（`timeout`）：本次调用的截止时间，为空则使用 `FeedConfig` 中的默认值。
///
/// 典型用法：
/// ```rust
/// use feed_application::context::AppContext;
/// use std::time::Duration;
///
/// let ctx = AppContext::default()
///     .with_request_id("req-123")
///     .with_timeout(Duration::from_millis(500));
/// assert_eq!(ctx.timeout, Some(Duration::from_millis(500)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    /// 请求 ID（可选）
    pub request_id: Option<String>,
    /// 本次调用的超时（可选）
    pub timeout: Option<Duration>,
}

impl AppContext {
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }
}
