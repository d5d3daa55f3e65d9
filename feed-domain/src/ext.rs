//! 扩展字段（ExtendFields）
//!
//! 事件携带的不透明键值对，不同事件类型有不同的解析方式：
//! - 文章事件要求 `uid`（发布者）；
//! - 点赞事件要求 `liked`（被点赞的人），并携带 `liker`、`biz`、`bizId`；
//! - 关注事件要求 `followee`（被关注的人），并携带 `follower`。
//!
//! 持久化时以 JSON 对象字符串存储；读取时对损坏的内容做容忍处理，
//! 返回空的扩展字段而不是让整页查询失败。
//!
use crate::error::{FeedError, FeedResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtendFields(HashMap<String, String>);

impl ExtendFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出某个键，返回可按类型解析的字段值
    pub fn get(&self, key: &str) -> FieldValue<'_> {
        FieldValue {
            key: key.to_string(),
            raw: self.0.get(key).map(String::as_str),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// 链式构造
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }

    /// 序列化为存储用的 content 字符串
    pub fn to_content(&self) -> FeedResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// 从存储的 content 还原；内容损坏时返回空的扩展字段
    pub fn from_content(content: &str) -> Self {
        match serde_json::from_str::<HashMap<String, String>>(content) {
            Ok(map) => Self(map),
            Err(err) => {
                tracing::warn!(error = %err, "tolerating malformed feed event content");
                Self::default()
            }
        }
    }
}

impl From<HashMap<String, String>> for ExtendFields {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for ExtendFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// 扩展字段中的单个值
#[derive(Debug, Clone)]
pub struct FieldValue<'a> {
    key: String,
    raw: Option<&'a str>,
}

impl<'a> FieldValue<'a> {
    pub fn is_present(&self) -> bool {
        self.raw.is_some()
    }

    pub fn as_str(&self) -> FeedResult<&'a str> {
        self.raw.ok_or_else(|| FeedError::missing_field(&self.key))
    }

    pub fn as_i64(&self) -> FeedResult<i64> {
        let raw = self.as_str()?;
        raw.trim()
            .parse::<i64>()
            .map_err(|e| FeedError::invalid_field(&self.key, format!("`{raw}` is not an i64: {e}")))
    }

    pub fn as_bool(&self) -> FeedResult<bool> {
        let raw = self.as_str()?;
        raw.trim()
            .parse::<bool>()
            .map_err(|e| FeedError::invalid_field(&self.key, format!("`{raw}` is not a bool: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_extraction() {
        let ext = ExtendFields::new()
            .with("uid", "42")
            .with("title", "hello")
            .with("pinned", "true");

        assert_eq!(ext.get("uid").as_i64().unwrap(), 42);
        assert_eq!(ext.get("title").as_str().unwrap(), "hello");
        assert!(ext.get("pinned").as_bool().unwrap());
    }

    #[test]
    fn absent_key_is_a_typed_error() {
        let ext = ExtendFields::new();
        match ext.get("uid").as_i64().unwrap_err() {
            FeedError::MissingOrInvalidField { key, .. } => assert_eq!(key, "uid"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!ext.get("uid").is_present());
    }

    #[test]
    fn unparseable_value_is_a_typed_error() {
        let ext = ExtendFields::new().with("liked", "not-a-number");
        match ext.get("liked").as_i64().unwrap_err() {
            FeedError::MissingOrInvalidField { key, reason } => {
                assert_eq!(key, "liked");
                assert!(reason.contains("not-a-number"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn content_roundtrip_is_lossless() {
        let ext = ExtendFields::new()
            .with("liked", "1")
            .with("liker", "10")
            .with("biz", "article")
            .with("bizId", "8");
        let content = ext.to_content().unwrap();
        assert_eq!(ExtendFields::from_content(&content), ext);
    }

    #[test]
    fn malformed_content_degrades_to_empty() {
        assert!(ExtendFields::from_content("{not json").is_empty());
        assert!(ExtendFields::from_content(r#"{"uid": 1}"#).is_empty());
        assert!(ExtendFields::from_content("").is_empty());
    }
}
