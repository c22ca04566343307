//! Sefaria Client - 调用 Sefaria 经文服务
//!
//! 实现 ScripturePort trait，按引用跨越的整章获取英文经文
//!
//! 外部 API:
//! GET https://www.sefaria.org/api/texts/Genesis.6-11?lang=en&context=0
//! Response: {"text": [["...", ...], ...], "versionTitle": "...", "versionSource": "..."}
//!
//! `text` 为字符串数组时是单章，为数组的数组时是多章

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::{ScriptureError, ScripturePassage, ScripturePort};
use crate::domain::{Chapter, ScriptureReference, ScriptureText};

/// Sefaria 响应
#[derive(Debug, Deserialize)]
struct SefariaResponse {
    #[serde(default)]
    text: Value,
    #[serde(default, rename = "versionTitle")]
    version_title: Option<String>,
    #[serde(default, rename = "versionSource")]
    version_source: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Sefaria 客户端配置
#[derive(Debug, Clone)]
pub struct SefariaClientConfig {
    /// API 基础 URL
    pub url: String,
    /// 译本名称，None 时使用服务默认译本
    pub version: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for SefariaClientConfig {
    fn default() -> Self {
        Self {
            url: "https://www.sefaria.org/api".to_string(),
            version: Some("The Contemporary Torah, Jewish Publication Society, 2006".to_string()),
            timeout_secs: 20,
        }
    }
}

impl SefariaClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Sefaria 客户端
///
/// HTTP 客户端由调用方传入，可与其他适配器共享连接池
pub struct SefariaClient {
    client: Client,
    config: SefariaClientConfig,
}

impl SefariaClient {
    pub fn new(client: Client, config: SefariaClientConfig) -> Self {
        Self { client, config }
    }

    /// 使用独立的 HTTP 客户端
    pub fn standalone(config: SefariaClientConfig) -> Result<Self, ScriptureError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScriptureError::NetworkError(e.to_string()))?;
        Ok(Self::new(client, config))
    }

    /// 整章文本 URL，例如 `{url}/texts/Genesis.6-11`
    fn text_url(&self, reference: &ScriptureReference) -> String {
        format!(
            "{}/texts/{}",
            self.config.url.trim_end_matches('/'),
            reference.chapter_span()
        )
    }

    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("lang", "en".to_string()), ("context", "0".to_string())];
        if let Some(version) = &self.config.version {
            params.push(("version", version.clone()));
        }
        params
    }
}

/// 非字符串条目保留为空经节，经节号与位置保持一致
fn verse_strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect()
}

fn has_content(text: &ScriptureText) -> bool {
    match text {
        ScriptureText::Flat(verses) => verses.iter().any(|v| !v.trim().is_empty()),
        ScriptureText::Chaptered(chapters) => chapters
            .iter()
            .flat_map(|c| c.verses.iter())
            .any(|v| !v.trim().is_empty()),
    }
}

/// 将 `text` 字段转换为按章文本，章节号从 first_chapter 开始
fn parse_text(text: &Value, first_chapter: u32) -> Result<ScriptureText, ScriptureError> {
    let Value::Array(items) = text else {
        return Err(ScriptureError::InvalidResponse(
            "`text` is not an array".to_string(),
        ));
    };

    let nested = items.iter().any(Value::is_array);
    let chapters = if nested {
        items
            .iter()
            .enumerate()
            .map(|(i, chapter)| {
                let verses = chapter.as_array().map(|v| verse_strings(v)).unwrap_or_default();
                Chapter::full(first_chapter.saturating_add(i as u32), verses)
            })
            .collect()
    } else {
        vec![Chapter::full(first_chapter, verse_strings(items))]
    };

    Ok(ScriptureText::Chaptered(chapters))
}

#[async_trait]
impl ScripturePort for SefariaClient {
    async fn fetch_text(
        &self,
        reference: &ScriptureReference,
    ) -> Result<ScripturePassage, ScriptureError> {
        let url = self.text_url(reference);
        tracing::debug!(url = %url, reference = %reference, "Fetching scripture text");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params())
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScriptureError::Timeout
                } else if e.is_connect() {
                    ScriptureError::NetworkError(format!("Cannot connect to text service: {}", e))
                } else {
                    ScriptureError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScriptureError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: SefariaResponse = response
            .json()
            .await
            .map_err(|e| ScriptureError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(ScriptureError::ServiceError(error));
        }

        let text = parse_text(&body.text, reference.start_chapter)?;
        if !has_content(&text) {
            return Err(ScriptureError::NotFound(reference.chapter_span()));
        }

        tracing::debug!(
            reference = %reference,
            verses = text.verse_count(),
            version = ?body.version_title,
            "Scripture text received"
        );

        Ok(ScripturePassage {
            text,
            version: body.version_title,
            source_url: body.version_source,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/texts/Genesis.1", self.config.url.trim_end_matches('/')))
            .query(&[("lang", "en"), ("context", "0")])
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
