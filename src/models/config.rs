//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Partner API connection and deep-link settings
    #[serde(default)]
    pub partner: PartnerConfig,

    /// Keyword preparation settings
    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let partner = &self.partner;
        if partner.base_url.trim().is_empty() {
            return Err(AppError::validation("partner.base_url is empty"));
        }
        url::Url::parse(&partner.base_url)?;
        if partner.user_agent.trim().is_empty() {
            return Err(AppError::validation("partner.user_agent is empty"));
        }
        if partner.timeout_secs == 0 {
            return Err(AppError::validation("partner.timeout_secs must be > 0"));
        }
        if partner.search_timeout_secs == 0 {
            return Err(AppError::validation(
                "partner.search_timeout_secs must be > 0",
            ));
        }
        if partner.retries == 0 {
            return Err(AppError::validation("partner.retries must be > 0"));
        }
        if partner.sub_id.is_some() && partner.sub_id_prefix.is_some() {
            return Err(AppError::validation(
                "partner.sub_id and partner.sub_id_prefix are mutually exclusive",
            ));
        }
        let keywords = &self.keywords;
        if keywords.general_top_k == 0
            || keywords.golden_top_k == 0
            || keywords.shopping_top_k == 0
        {
            return Err(AppError::validation("keywords.*_top_k must be > 0"));
        }
        Ok(())
    }
}

/// Width of the year in the `signed-date` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignedDateStyle {
    /// `YYMMDDTHHMMSSZ`
    #[default]
    Short,
    /// `YYYYMMDDTHHMMSSZ`
    Long,
}

impl SignedDateStyle {
    /// Format an instant as a signed-date value.
    pub fn format(self, at: DateTime<Utc>) -> String {
        match self {
            SignedDateStyle::Short => at.format("%y%m%dT%H%M%SZ").to_string(),
            SignedDateStyle::Long => at.format("%Y%m%dT%H%M%SZ").to_string(),
        }
    }
}

/// Partner API connection and deep-link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerConfig {
    /// Gateway origin, without trailing path
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Deep-link request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Product search request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub search_timeout_secs: u64,

    /// Attempts per deep-link batch
    #[serde(default = "defaults::retries")]
    pub retries: u32,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Verify the gateway's TLS certificate
    #[serde(default = "defaults::verify_tls")]
    pub verify_tls: bool,

    #[serde(default)]
    pub signed_date: SignedDateStyle,

    /// Fixed subId attached to every deep-link request
    #[serde(default)]
    pub sub_id: Option<String>,

    /// Prefix for a per-run `prefix-<unix-timestamp>` subId
    #[serde(default)]
    pub sub_id_prefix: Option<String>,

    #[serde(default)]
    pub channel_id: Option<String>,
}

impl PartnerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    /// subId to use for a run started at `now`.
    pub fn sub_id_at(&self, now: DateTime<Utc>) -> Option<String> {
        if let Some(sub_id) = self.sub_id.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(sub_id.to_string());
        }
        self.sub_id_prefix
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|prefix| format!("{}-{}", prefix, now.timestamp()))
    }
}

impl Default for PartnerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            timeout_secs: defaults::timeout(),
            search_timeout_secs: defaults::timeout(),
            retries: defaults::retries(),
            user_agent: defaults::user_agent(),
            verify_tls: defaults::verify_tls(),
            signed_date: SignedDateStyle::default(),
            sub_id: None,
            sub_id_prefix: None,
            channel_id: None,
        }
    }
}

/// Keyword preparation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Single-line keyword CSV, relative to the data directory
    #[serde(default = "defaults::keyword_input")]
    pub input_file: String,

    /// Rows in `keywords_general.csv`
    #[serde(default = "defaults::general_top_k")]
    pub general_top_k: usize,

    /// Rows in `golden_keywords.csv`
    #[serde(default = "defaults::golden_top_k")]
    pub golden_top_k: usize,

    /// Rows in `golden_shopping_keywords.csv`
    #[serde(default = "defaults::golden_top_k")]
    pub shopping_top_k: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            input_file: defaults::keyword_input(),
            general_top_k: defaults::general_top_k(),
            golden_top_k: defaults::golden_top_k(),
            shopping_top_k: defaults::golden_top_k(),
        }
    }
}

mod defaults {
    // Partner defaults
    pub fn base_url() -> String {
        "https://api-gateway.coupang.com".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn retries() -> u32 {
        3
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; affiliate-linker/0.1)".into()
    }
    pub fn verify_tls() -> bool {
        true
    }

    // Keyword defaults
    pub fn keyword_input() -> String {
        "keywords.csv".into()
    }
    pub fn general_top_k() -> usize {
        10
    }
    pub fn golden_top_k() -> usize {
        5
    }
}
