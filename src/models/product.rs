//! Product search query and record structures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::{AppError, Result};

/// Largest page the search endpoint returns.
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// Result ordering accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Accuracy,
    SalesVolume,
    KeywordRank,
    PriceAsc,
    PriceDesc,
    Latest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Accuracy => "accuracy",
            SortOrder::SalesVolume => "salesVolume",
            SortOrder::KeywordRank => "keywordRank",
            SortOrder::PriceAsc => "priceAsc",
            SortOrder::PriceDesc => "priceDesc",
            SortOrder::Latest => "latest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "accuracy" => Ok(SortOrder::Accuracy),
            "salesVolume" => Ok(SortOrder::SalesVolume),
            "keywordRank" => Ok(SortOrder::KeywordRank),
            "priceAsc" => Ok(SortOrder::PriceAsc),
            "priceDesc" => Ok(SortOrder::PriceDesc),
            "latest" => Ok(SortOrder::Latest),
            other => Err(AppError::validation(format!(
                "unknown sort '{other}' (expected accuracy, salesVolume, keywordRank, priceAsc, priceDesc or latest)"
            ))),
        }
    }
}

/// Parameters of one product search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub limit: u32,
    pub sort: Option<SortOrder>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub rocket_only: Option<bool>,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            limit: 10,
            sort: None,
            min_price: None,
            max_price: None,
            rocket_only: None,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Effective limit, clamped to `1..=50`.
    pub fn clamped_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_SEARCH_LIMIT)
    }

    /// URL-encoded query string, without the leading `?`.
    ///
    /// This exact string is both signed and sent.
    ///
    /// ```
    /// use affiliate_linker::models::SearchQuery;
    ///
    /// let query = SearchQuery::new("무선 청소기").limit(80);
    /// assert_eq!(
    ///     query.to_query_string(),
    ///     "keyword=%EB%AC%B4%EC%84%A0+%EC%B2%AD%EC%86%8C%EA%B8%B0&limit=50"
    /// );
    /// ```
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("keyword", self.keyword.trim());
        serializer.append_pair("limit", &self.clamped_limit().to_string());
        if let Some(sort) = self.sort {
            serializer.append_pair("sort", sort.as_str());
        }
        if let Some(min) = self.min_price {
            serializer.append_pair("minPrice", &min.to_string());
        }
        if let Some(max) = self.max_price {
            serializer.append_pair("maxPrice", &max.to_string());
        }
        if let Some(rocket) = self.rocket_only {
            serializer.append_pair("rocketOnly", if rocket { "true" } else { "false" });
        }
        serializer.finish()
    }
}

/// A normalized product returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_name: String,
    pub product_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub category: String,
}
