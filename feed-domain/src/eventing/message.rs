//! 通用业务事件（BusinessEvent）
//!
use crate::error::FeedResult;
use crate::ext::ExtendFields;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 上游生产者投递的业务事件，字段名与生产端的 JSON 格式保持一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessEvent {
    #[serde(rename = "Type")]
    pub event_type: String,
    #[serde(rename = "Metadata", default)]
    pub metadata: HashMap<String, String>,
}

impl BusinessEvent {
    pub fn new(event_type: impl Into<String>, metadata: ExtendFields) -> Self {
        Self {
            event_type: event_type.into(),
            metadata: metadata.into_inner(),
        }
    }

    /// 从消息体解码
    pub fn from_json(bytes: &[u8]) -> FeedResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> FeedResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn ext(&self) -> ExtendFields {
        ExtendFields::from(self.metadata.clone())
    }
}
