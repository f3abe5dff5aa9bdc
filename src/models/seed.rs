//! Product seed rows (`products_seed.csv`).

use serde::{Deserialize, Serialize};

use crate::models::ProductRecord;

/// Host of already-issued affiliate short-links.
pub const AFFILIATE_LINK_HOST: &str = "link.coupang.com";

/// One row of `products_seed.csv`.
///
/// Only `raw_url` is consumed by the resolver; the other columns pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRow {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub raw_url: String,
    #[serde(default)]
    pub pros: String,
    #[serde(default)]
    pub cons: String,
}

impl SeedRow {
    /// Seed row for a searched product, with empty pros/cons.
    pub fn from_product(keyword: &str, product: &ProductRecord) -> Self {
        Self {
            keyword: keyword.to_string(),
            product_name: product.product_name.clone(),
            raw_url: product.product_url.clone(),
            pros: String::new(),
            cons: String::new(),
        }
    }

    /// The raw URL is already an affiliate short-link.
    pub fn is_affiliate_link(&self) -> bool {
        url::Url::parse(self.raw_url.trim())
            .ok()
            .and_then(|u| u.host_str().map(|h| h.eq_ignore_ascii_case(AFFILIATE_LINK_HOST)))
            .unwrap_or(false)
    }

    pub fn with_deeplink(self, deeplink: impl Into<String>) -> ResolvedSeedRow {
        ResolvedSeedRow {
            keyword: self.keyword,
            product_name: self.product_name,
            raw_url: self.raw_url,
            pros: self.pros,
            cons: self.cons,
            deeplink: deeplink.into(),
        }
    }
}

/// A seed row with its resolved deep-link appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSeedRow {
    pub keyword: String,
    pub product_name: String,
    pub raw_url: String,
    pub pros: String,
    pub cons: String,
    pub deeplink: String,
}
