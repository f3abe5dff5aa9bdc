// src/services/deeplink.rs

//! Deep-link client: one signed POST per batch of product URLs.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::DeepLinkMap;
use crate::pipeline::{BatchResolver, ResolveOptions};
use crate::services::partner::{DEEPLINK_PATH, PartnerApi};
use crate::utils::canonicalize;

/// Most URLs the deep-link endpoint accepts in one request.
pub const MAX_BATCH: usize = 50;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeepLinkRequest<'a> {
    coupang_urls: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_id: Option<&'a str>,
}

/// Client for the deep-link endpoint.
#[derive(Clone)]
pub struct DeepLinkClient {
    api: PartnerApi,
}

impl DeepLinkClient {
    pub fn new(api: PartnerApi) -> Self {
        Self { api }
    }

    /// Convert one batch of distinct, non-empty URLs into short-links.
    pub async fn call_batch(
        &self,
        batch: &[String],
        sub_id: Option<&str>,
        channel_id: Option<&str>,
        timeout: Duration,
    ) -> Result<DeepLinkMap> {
        if batch.is_empty() {
            return Ok(DeepLinkMap::new());
        }
        if batch.len() > MAX_BATCH {
            return Err(AppError::validation(format!(
                "deep-link batch of {} exceeds the limit of {MAX_BATCH}",
                batch.len()
            )));
        }
        if batch.iter().any(|u| u.trim().is_empty()) {
            return Err(AppError::validation("deep-link batch contains a blank URL"));
        }

        let request = DeepLinkRequest {
            coupang_urls: batch,
            sub_id,
            channel_id,
        };
        let body = self.api.post_json(DEEPLINK_PATH, &request, timeout).await?;
        parse_response(batch, &body)
    }
}

#[async_trait]
impl BatchResolver for DeepLinkClient {
    async fn resolve_batch(&self, batch: &[String], options: &ResolveOptions) -> Result<DeepLinkMap> {
        self.call_batch(
            batch,
            options.sub_id.as_deref(),
            options.channel_id.as_deref(),
            options.timeout,
        )
        .await
    }
}

/// Build the origin → short mapping from a deep-link response body.
///
/// Each item is keyed by its echoed `originUrl` (or `coupangUrl`) and, when
/// canonical forms match, also by every caller string from `batch`.
/// A missing or non-list `data` yields an empty map.
pub fn parse_response(batch: &[String], body: &str) -> Result<DeepLinkMap> {
    let envelope: Value = serde_json::from_str(body)?;
    let mut map = DeepLinkMap::new();

    let Some(items) = envelope.get("data").and_then(Value::as_array) else {
        log::warn!(
            "Deep-link response carried no data list (rCode={}, rMessage={})",
            envelope.get("rCode").unwrap_or(&Value::Null),
            envelope.get("rMessage").unwrap_or(&Value::Null)
        );
        return Ok(map);
    };

    let mut callers_by_canonical: HashMap<String, Vec<&str>> = HashMap::new();
    for url in batch {
        callers_by_canonical
            .entry(canonicalize(url))
            .or_default()
            .push(url);
    }

    for item in items {
        let origin = non_empty_str(item, "originUrl").or_else(|| non_empty_str(item, "coupangUrl"));
        let (Some(origin), Some(short)) = (origin, non_empty_str(item, "shortenUrl")) else {
            continue;
        };

        map.insert(origin, short);
        if let Some(callers) = callers_by_canonical.get(&canonicalize(origin)) {
            for caller in callers {
                map.insert(*caller, short);
            }
        }
    }

    Ok(map)
}

fn non_empty_str<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{Credentials, SignedDateStyle};
    use crate::services::Signer;
    use crate::services::signer::SystemClock;
    use crate::utils::http::mock::MockTransport;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn client(transport: Arc<MockTransport>) -> DeepLinkClient {
        let signer = Signer::new(
            Credentials::new("ak", "sk"),
            Arc::new(SystemClock),
            SignedDateStyle::Short,
        );
        DeepLinkClient::new(PartnerApi::new(transport, signer, "https://gateway.test"))
    }

    #[test]
    fn test_exact_echo() {
        let body = r#"{"rCode":"0","data":[{"originUrl":"https://www.coupang.com/vp/p/123","shortenUrl":"https://link.coupang.com/a/X","landingUrl":"ignored"}]}"#;
        let map = parse_response(&urls(&["https://www.coupang.com/vp/p/123"]), body).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("https://www.coupang.com/vp/p/123"),
            Some("https://link.coupang.com/a/X")
        );
    }

    #[test]
    fn test_dual_mapping_on_canonical_match() {
        let body = r#"{"data":[{"originUrl":"HTTP://Host/X/","shortenUrl":"https://link/s"}]}"#;
        let map = parse_response(&urls(&["http://host/x"]), body).unwrap();
        assert_eq!(map.get("HTTP://Host/X/"), Some("https://link/s"));
        assert_eq!(map.get("http://host/x"), Some("https://link/s"));
    }

    #[test]
    fn test_coupang_url_alias() {
        let body = r#"{"data":[{"coupangUrl":"https://a/1","shortenUrl":"https://link/1"}]}"#;
        let map = parse_response(&urls(&["https://a/1"]), body).unwrap();
        assert_eq!(map.get("https://a/1"), Some("https://link/1"));
    }

    #[test]
    fn test_incomplete_items_skipped() {
        let body = r#"{"data":[
            {"originUrl":"https://a/1","shortenUrl":""},
            {"originUrl":"","shortenUrl":"https://link/2"},
            {"shortenUrl":"https://link/3"},
            "garbage"
        ]}"#;
        let map = parse_response(&urls(&["https://a/1"]), body).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_missing_or_non_list_data_is_empty() {
        let batch = urls(&["https://a/1"]);
        assert!(parse_response(&batch, r#"{"rCode":"400","rMessage":"bad"}"#).unwrap().is_empty());
        assert!(parse_response(&batch, r#"{"data":{"x":1}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(parse_response(&urls(&["https://a/1"]), "<html>").is_err());
    }

    #[tokio::test]
    async fn test_request_body_includes_optional_ids() {
        let transport = Arc::new(MockTransport::fixed(200, r#"{"data":[]}"#));
        client(Arc::clone(&transport))
            .call_batch(
                &urls(&["https://a/1"]),
                Some("blog-1700000000"),
                Some("main"),
                Duration::from_secs(15),
            )
            .await
            .unwrap();

        let sent: Value = serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({
                "coupangUrls": ["https://a/1"],
                "subId": "blog-1700000000",
                "channelId": "main"
            })
        );
    }

    #[tokio::test]
    async fn test_request_body_omits_unset_ids() {
        let transport = Arc::new(MockTransport::fixed(200, r#"{"data":[]}"#));
        client(Arc::clone(&transport))
            .call_batch(&urls(&["https://a/1"]), None, None, Duration::from_secs(15))
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].body.as_deref(),
            Some(r#"{"coupangUrls":["https://a/1"]}"#)
        );
    }

    #[tokio::test]
    async fn test_oversized_batch_rejected_without_request() {
        let transport = Arc::new(MockTransport::fixed(200, r#"{"data":[]}"#));
        let batch: Vec<String> = (0..=MAX_BATCH).map(|i| format!("https://a/{i}")).collect();
        let result = client(Arc::clone(&transport))
            .call_batch(&batch, None, None, Duration::from_secs(15))
            .await;
        assert!(result.is_err());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_body() {
        let transport = Arc::new(MockTransport::fixed(500, "gateway exploded"));
        let err = client(transport)
            .call_batch(&urls(&["https://a/1"]), None, None, Duration::from_secs(15))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: gateway exploded");
    }
}
