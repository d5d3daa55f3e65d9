//! 应用配置（FeedConfig）
//!
//! 默认值可直接使用；`from_env` 从 `FEED_*` 环境变量覆盖，
//! 值无法解析时返回 `AppError::Config`。
//!
use crate::error::AppError;
use feed_domain::handlers::ArticleEventConfig;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub article: ArticleEventConfig,
    /// 一次时间线读取的整体超时
    pub read_timeout: Duration,
    /// 一次事件写入的整体超时
    pub write_timeout: Duration,
    /// 未指定 limit 时的页大小
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            article: ArticleEventConfig::default(),
            read_timeout: Duration::from_secs(3),
            write_timeout: Duration::from_secs(3),
            default_page_size: 20,
            max_page_size: 200,
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取，缺失的键保留默认值
    pub fn from_source<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = parse(&lookup, "FEED_FANOUT_THRESHOLD")? {
            cfg.article.fanout_threshold = v;
        }
        if let Some(v) = parse(&lookup, "FEED_FOLLOWEE_LIMIT")? {
            cfg.article.followee_limit = v;
        }
        if let Some(v) = parse(&lookup, "FEED_PUSH_FANOUT_LIMIT")? {
            cfg.article.push_fanout_limit = v;
        }
        if let Some(ms) = parse::<u64, _>(&lookup, "FEED_READ_TIMEOUT_MS")? {
            cfg.read_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64, _>(&lookup, "FEED_WRITE_TIMEOUT_MS")? {
            cfg.write_timeout = Duration::from_millis(ms);
        }
        if let Some(v) = parse(&lookup, "FEED_DEFAULT_PAGE_SIZE")? {
            cfg.default_page_size = v;
        }
        if let Some(v) = parse(&lookup, "FEED_MAX_PAGE_SIZE")? {
            cfg.max_page_size = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.max_page_size == 0 {
            return Err(AppError::Config {
                key: "FEED_MAX_PAGE_SIZE",
                reason: "must be positive".into(),
            });
        }
        if let Err(err) = self.article.validate() {
            return Err(AppError::Config {
                key: "FEED_PUSH_FANOUT_LIMIT",
                reason: err.to_string(),
            });
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(AppError::Config {
                key: "FEED_DEFAULT_PAGE_SIZE",
                reason: format!("must be within 1..={}", self.max_page_size),
            });
        }
        Ok(())
    }
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config {
                key,
                reason: format!("`{raw}`: {e}"),
            }),
    }
}
