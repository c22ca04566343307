//! Hebcal Client - 调用 Hebcal 日历服务
//!
//! 实现 CalendarPort trait，查询 today 起两周内的周读 parasha
//!
//! 外部 API:
//! GET https://www.hebcal.com/hebcal?v=1&cfg=json&s=on&start=2024-06-12&end=2024-06-26
//! Response: {"items": [{"title": "Parashat Nasso", "date": "2024-06-15", "category": "parashat", ...}]}

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{CalendarError, CalendarPort, CurrentPortion};
use crate::domain::Location;

/// 查询窗口（天）
const LOOKAHEAD_DAYS: i64 = 14;

/// 标题前缀
const TITLE_PREFIX: &str = "Parashat ";

/// Hebcal 响应
#[derive(Debug, Deserialize)]
struct HebcalResponse {
    #[serde(default)]
    items: Vec<HebcalItem>,
}

#[derive(Debug, Deserialize)]
struct HebcalItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    category: String,
}

/// Hebcal 客户端配置
#[derive(Debug, Clone)]
pub struct HebcalClientConfig {
    /// 服务 URL
    pub url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 以色列日程使用的地点（默认耶路撒冷）
    pub israel_geoname_id: Option<u32>,
}

impl Default for HebcalClientConfig {
    fn default() -> Self {
        Self {
            url: "https://www.hebcal.com/hebcal".to_string(),
            timeout_secs: 10,
            israel_geoname_id: Some(281184),
        }
    }
}

impl HebcalClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Hebcal 客户端
///
/// HTTP 客户端由调用方传入，可与其他适配器共享连接池
pub struct HebcalClient {
    client: Client,
    config: HebcalClientConfig,
}

impl HebcalClient {
    pub fn new(client: Client, config: HebcalClientConfig) -> Self {
        Self { client, config }
    }

    /// 使用独立的 HTTP 客户端
    pub fn standalone(config: HebcalClientConfig) -> Result<Self, CalendarError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CalendarError::NetworkError(e.to_string()))?;
        Ok(Self::new(client, config))
    }

    fn query_params(&self, location: Location, today: NaiveDate) -> Vec<(&'static str, String)> {
        let end = today + Duration::days(LOOKAHEAD_DAYS);
        let mut params = vec![
            ("v", "1".to_string()),
            ("cfg", "json".to_string()),
            ("s", "on".to_string()),
            ("start", today.format("%Y-%m-%d").to_string()),
            ("end", end.format("%Y-%m-%d").to_string()),
        ];

        match location {
            Location::Diaspora => params.push(("i", "off".to_string())),
            Location::Israel => {
                params.push(("i", "on".to_string()));
                if let Some(id) = self.config.israel_geoname_id {
                    params.push(("geo", "geoname".to_string()));
                    params.push(("geonameid", id.to_string()));
                }
            }
        }
        params
    }
}

/// 取第一个日期不早于 today 的周读条目
fn pick_current(items: &[HebcalItem], today: NaiveDate) -> Option<CurrentPortion> {
    items
        .iter()
        .filter(|item| item.category == "parashat")
        .filter_map(|item| {
            // 带时间的条目形如 2024-06-14T20:13:00-04:00
            let date = item
                .date
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())?;
            let name = item
                .title
                .strip_prefix(TITLE_PREFIX)
                .unwrap_or(&item.title)
                .trim();
            (!name.is_empty()).then(|| CurrentPortion {
                name: name.to_string(),
                date,
            })
        })
        .find(|portion| portion.date >= today)
}

#[async_trait]
impl CalendarPort for HebcalClient {
    async fn current_portion(
        &self,
        location: Location,
        today: NaiveDate,
    ) -> Result<Option<CurrentPortion>, CalendarError> {
        tracing::debug!(
            url = %self.config.url,
            location = %location,
            today = %today,
            "Querying calendar"
        );

        let response = self
            .client
            .get(&self.config.url)
            .query(&self.query_params(location, today))
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CalendarError::Timeout
                } else if e.is_connect() {
                    CalendarError::NetworkError(format!("Cannot connect to calendar service: {}", e))
                } else {
                    CalendarError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CalendarError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: HebcalResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::InvalidResponse(e.to_string()))?;

        let current = pick_current(&body.items, today);
        tracing::debug!(
            location = %location,
            items = body.items.len(),
            current = ?current.as_ref().map(|c| c.name.as_str()),
            "Calendar response received"
        );
        Ok(current)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(&self.config.url)
            .query(&[("v", "1"), ("cfg", "json")])
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client_for(server: &MockServer) -> HebcalClient {
        HebcalClient::standalone(HebcalClientConfig::new(server.url("/hebcal")).with_timeout(5))
            .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = HebcalClientConfig::default();
        assert_eq!(config.url, "https://www.hebcal.com/hebcal");
        assert_eq!(config.israel_geoname_id, Some(281184));
    }

    #[test]
    fn test_pick_current_skips_past_and_other_categories() {
        let items = vec![
            HebcalItem {
                title: "Parashat Bamidbar".into(),
                date: "2024-06-08".into(),
                category: "parashat".into(),
            },
            HebcalItem {
                title: "Candle lighting: 8:13pm".into(),
                date: "2024-06-14T20:13:00-04:00".into(),
                category: "candles".into(),
            },
            HebcalItem {
                title: "Parashat Nasso".into(),
                date: "2024-06-15".into(),
                category: "parashat".into(),
            },
        ];
        let current = pick_current(&items, date(2024, 6, 12)).unwrap();
        assert_eq!(current.name, "Nasso");
        assert_eq!(current.date, date(2024, 6, 15));
    }

    #[test]
    fn test_pick_current_includes_today() {
        let items = vec![HebcalItem {
            title: "Parashat Vayakhel-Pekudei".into(),
            date: "2024-03-09".into(),
            category: "parashat".into(),
        }];
        let current = pick_current(&items, date(2024, 3, 9)).unwrap();
        assert_eq!(current.name, "Vayakhel-Pekudei");
    }

    #[tokio::test]
    async fn test_current_portion_from_service() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/hebcal")
                    .query_param("cfg", "json")
                    .query_param("start", "2024-06-12")
                    .query_param("end", "2024-06-26")
                    .query_param("i", "off");
                then.status(200).json_body(serde_json::json!({
                    "items": [
                        {"title": "Parashat Nasso", "date": "2024-06-15", "category": "parashat"},
                        {"title": "Parashat Beha'alotcha", "date": "2024-06-22", "category": "parashat"}
                    ]
                }));
            })
            .await;

        let current = client_for(&server)
            .current_portion(Location::Diaspora, date(2024, 6, 12))
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(current.name, "Nasso");
    }

    #[tokio::test]
    async fn test_israel_query_uses_geoname() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/hebcal")
                    .query_param("i", "on")
                    .query_param("geonameid", "281184");
                then.status(200).json_body(serde_json::json!({"items": []}));
            })
            .await;

        let current = client_for(&server)
            .current_portion(Location::Israel, date(2024, 6, 12))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(current.is_none());
    }

    #[tokio::test]
    async fn test_service_error_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/hebcal");
                then.status(503).body("maintenance");
            })
            .await;

        let err = client_for(&server)
            .current_portion(Location::Diaspora, date(2024, 6, 12))
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::ServiceError(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_invalid_body_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/hebcal");
                then.status(200).body("not json");
            })
            .await;

        let err = client_for(&server)
            .current_portion(Location::Diaspora, date(2024, 6, 12))
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::InvalidResponse(_)));
    }
}
