//! 应用层错误定义
//!
//! 统一的查询错误类型

use thiserror::Error;

use crate::application::ports::CacheError;
use crate::domain::ParashaError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// parasha 名称不在循环或引用表中
    #[error("Unknown portion: {0}")]
    UnknownPortion(String),

    /// 引用表条目不符合格式（配置缺陷）
    #[error("Malformed reference `{reference}`: {reason}")]
    MalformedReference { reference: String, reason: String },

    /// 当前 parasha 无法确定，且回退策略为拒绝
    #[error("Current portion unresolved for {location}")]
    UnresolvedPortion { location: String },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 缓存错误
    #[error("Cache error: {0}")]
    CacheError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<ParashaError> for ApplicationError {
    fn from(err: ParashaError) -> Self {
        match err {
            ParashaError::UnknownPortion(name) => Self::UnknownPortion(name),
            ParashaError::MalformedReference { reference, reason } => {
                Self::MalformedReference { reference, reason }
            }
            ParashaError::InvalidLocation(_) | ParashaError::InvalidFallbackPolicy(_) => {
                Self::ValidationError(err.to_string())
            }
        }
    }
}

impl From<CacheError> for ApplicationError {
    fn from(err: CacheError) -> Self {
        Self::CacheError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parasha_errors_keep_their_kind() {
        let err: ApplicationError = ParashaError::UnknownPortion("Purim".into()).into();
        assert!(matches!(err, ApplicationError::UnknownPortion(name) if name == "Purim"));

        let err: ApplicationError = ParashaError::MalformedReference {
            reference: "Genesis 1".into(),
            reason: "bad".into(),
        }
        .into();
        assert!(matches!(err, ApplicationError::MalformedReference { .. }));

        let err: ApplicationError = ParashaError::InvalidLocation("mars".into()).into();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
