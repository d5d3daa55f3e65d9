use feed_domain::ext::ExtendFields;

/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，通常会修改领域状态。
/// - 不返回业务数据，仅表达执行结果（成功/失败）；
/// - 与 [`Query`](crate::query::Query) 相对，`Command` 应避免读写混用。
///
/// 关联常量：
/// - `NAME`：命令的稳定名称，用于日志与追踪。避免依赖 `type_name::<T>()`。
pub trait Command: Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;
}

/// 记录一条新的业务事件
#[derive(Debug, Clone)]
pub struct CreateFeedEvent {
    pub event_type: String,
    pub ext: ExtendFields,
}

impl CreateFeedEvent {
    pub fn new(event_type: impl Into<String>, ext: ExtendFields) -> Self {
        Self {
            event_type: event_type.into(),
            ext,
        }
    }
}

impl Command for CreateFeedEvent {
    const NAME: &'static str = "CreateFeedEvent";
}
