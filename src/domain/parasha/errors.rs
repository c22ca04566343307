//! Parasha Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParashaError {
    #[error("未知的周读经文: {0}")]
    UnknownPortion(String),

    #[error("经文引用格式错误 `{reference}`: {reason}")]
    MalformedReference { reference: String, reason: String },

    #[error("无效的地区: {0}")]
    InvalidLocation(String),

    #[error("无效的回退策略: {0}")]
    InvalidFallbackPolicy(String),
}

impl ParashaError {
    pub(crate) fn malformed(reference: &str, reason: impl Into<String>) -> Self {
        Self::MalformedReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}
