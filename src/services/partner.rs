// src/services/partner.rs

//! Signed request plumbing shared by the deep-link and search clients.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::services::Signer;
use crate::utils::http::{ApiRequest, Method, Transport};

/// Gateway path of the deep-link endpoint.
pub const DEEPLINK_PATH: &str = "/v2/providers/affiliate_open_api/apis/openapi/v1/deeplink";

/// Gateway path of the product search endpoint.
pub const SEARCH_PATH: &str = "/v2/providers/affiliate_open_api/apis/openapi/products/search";

/// Signs, sends and status-checks partner API requests.
#[derive(Clone)]
pub struct PartnerApi {
    transport: Arc<dyn Transport>,
    signer: Signer,
    base_url: String,
}

impl PartnerApi {
    pub fn new(transport: Arc<dyn Transport>, signer: Signer, base_url: &str) -> Self {
        Self {
            transport,
            signer,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// POST a JSON body to `path` (no query string) and return the response body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<String> {
        let body = serde_json::to_string(body)?;
        self.execute(
            Method::Post,
            path,
            vec![("Content-Type", "application/json".to_string())],
            Some(body),
            timeout,
        )
        .await
    }

    /// GET `path?query` and return the response body.
    ///
    /// `query` is already URL-encoded; the same bytes are signed and sent.
    pub async fn get(&self, path: &str, query: &str, timeout: Duration) -> Result<String> {
        let path_with_query = if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        };
        self.execute(
            Method::Get,
            &path_with_query,
            vec![("Accept", "application/json".to_string())],
            None,
            timeout,
        )
        .await
    }

    async fn execute(
        &self,
        method: Method,
        path_with_query: &str,
        mut headers: Vec<(&'static str, String)>,
        body: Option<String>,
        timeout: Duration,
    ) -> Result<String> {
        // Signed fresh for every request, retries included.
        let authorization = self.signer.authorization(method.as_str(), path_with_query)?;
        headers.insert(0, ("Authorization", authorization));

        let request = ApiRequest {
            method,
            url: format!("{}{}", self.base_url, path_with_query),
            headers,
            body,
            timeout,
        };

        log::debug!("{} {}", method.as_str(), request.url);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(AppError::status(response.status, &response.body));
        }
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credentials, SignedDateStyle};
    use crate::services::signer::SystemClock;
    use crate::utils::http::mock::MockTransport;

    fn api(transport: Arc<MockTransport>) -> PartnerApi {
        let signer = Signer::new(
            Credentials::new("ak", "sk"),
            Arc::new(SystemClock),
            SignedDateStyle::Short,
        );
        PartnerApi::new(transport, signer, "https://gateway.test/")
    }

    #[tokio::test]
    async fn test_post_sets_headers_and_body() {
        let transport = Arc::new(MockTransport::fixed(200, "{}"));
        let body = serde_json::json!({ "coupangUrls": ["https://a/1"] });
        api(Arc::clone(&transport))
            .post_json(DEEPLINK_PATH, &body, Duration::from_secs(3))
            .await
            .unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.url, format!("https://gateway.test{DEEPLINK_PATH}"));
        assert_eq!(sent.header("Content-Type"), Some("application/json"));
        assert!(sent.header("Authorization").unwrap().starts_with("CEA algorithm=HmacSHA256"));
        assert_eq!(sent.body.as_deref(), Some(r#"{"coupangUrls":["https://a/1"]}"#));
        assert_eq!(sent.timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let transport = Arc::new(MockTransport::fixed(401, "unauthorized"));
        let err = api(transport)
            .get(SEARCH_PATH, "keyword=tv&limit=1", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Status { status: 401, .. }));
    }
}
