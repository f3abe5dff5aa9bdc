// src/services/search.rs

//! Product search client.
//!
//! Issues one signed GET per search; HTTP errors are returned as-is, there
//! is no retry at this layer.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::Result;
use crate::models::{Credentials, PartnerConfig, ProductRecord, SearchQuery};
use crate::services::partner::SEARCH_PATH;
use crate::services::signer::{Clock, SystemClock};
use crate::services::{PartnerApi, Signer};
use crate::utils::http::{HttpTransport, Transport};

const NAME_KEYS: &[&str] = &["productName", "title", "name"];
const URL_KEYS: &[&str] = &["productUrl", "link", "url"];
const IMAGE_KEYS: &[&str] = &["productImage", "imageUrl", "image"];
const PRICE_KEYS: &[&str] = &["productPrice", "price", "lPrice"];
const CATEGORY_KEYS: &[&str] = &["categoryName", "category"];

/// Client for the product search endpoint.
#[derive(Clone)]
pub struct ProductSearchClient {
    api: PartnerApi,
    timeout: Duration,
}

impl ProductSearchClient {
    pub fn new(credentials: Credentials, config: &PartnerConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(
            credentials,
            config,
            transport,
            Arc::new(SystemClock),
        ))
    }

    pub fn with_transport(
        credentials: Credentials,
        config: &PartnerConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let signer = Signer::new(credentials, clock, config.signed_date);
        Self {
            api: PartnerApi::new(transport, signer, &config.base_url),
            timeout: config.search_timeout(),
        }
    }

    /// Search products; records without a name or URL are dropped.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductRecord>> {
        self.api.signer().credentials().ensure_present()?;
        let body = self
            .api
            .get(SEARCH_PATH, &query.to_query_string(), self.timeout)
            .await?;
        let products = parse_products(&body)?;
        log::info!(
            "Search '{}' returned {} product(s)",
            query.keyword,
            products.len()
        );
        Ok(products)
    }
}

/// Normalize a search response body into product records.
///
/// Accepts `{data: [...]}`, `{productData: [...]}` and `{data: {productData: [...]}}`.
pub fn parse_products(body: &str) -> Result<Vec<ProductRecord>> {
    let envelope: Value = serde_json::from_str(body)?;
    let Some(items) = product_array(&envelope) else {
        log::warn!(
            "Search response carried no product list (rCode={})",
            envelope.get("rCode").unwrap_or(&Value::Null)
        );
        return Ok(Vec::new());
    };

    Ok(items.iter().filter_map(normalize_product).collect())
}

fn product_array(envelope: &Value) -> Option<&Vec<Value>> {
    envelope
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| envelope.get("productData").and_then(Value::as_array))
        .or_else(|| {
            envelope
                .get("data")
                .and_then(|d| d.get("productData"))
                .and_then(Value::as_array)
        })
}

fn normalize_product(item: &Value) -> Option<ProductRecord> {
    let product_name = first_text(item, NAME_KEYS)?;
    let product_url = first_text(item, URL_KEYS)?;
    Some(ProductRecord {
        product_name,
        product_url,
        image_url: first_text(item, IMAGE_KEYS).unwrap_or_default(),
        price: PRICE_KEYS.iter().find_map(|k| item.get(*k).and_then(price_value)),
        category: first_text(item, CATEGORY_KEYS).unwrap_or_default(),
    })
}

fn first_text(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| item.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn price_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(amount)),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned.parse::<f64>().ok().and_then(amount)
        }
        _ => None,
    }
}

/// Whole currency amount; negative or non-finite values are rejected.
fn amount(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.round() as u64)
}
