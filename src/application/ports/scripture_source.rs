//! Scripture Port - 经文数据源抽象
//!
//! 定义经文获取的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ScriptureReference, ScriptureText};

/// 经文数据源错误
#[derive(Debug, Error)]
pub enum ScriptureError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Text not found: {0}")]
    NotFound(String),
}

/// 获取到的经文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScripturePassage {
    /// 引用跨越的整章文本（或数据源已过滤的平铺文本）
    pub text: ScriptureText,
    /// 译本名称
    pub version: Option<String>,
    /// 译本来源链接
    pub source_url: Option<String>,
}

impl ScripturePassage {
    pub fn new(text: ScriptureText) -> Self {
        Self {
            text,
            version: None,
            source_url: None,
        }
    }
}

/// Scripture Port
#[async_trait]
pub trait ScripturePort: Send + Sync {
    /// 获取引用跨越的经文
    ///
    /// 返回的文本可能多于引用范围（整章），由调用方提取
    async fn fetch_text(
        &self,
        reference: &ScriptureReference,
    ) -> Result<ScripturePassage, ScriptureError>;

    /// 检查数据源是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
