// src/services/resolver.rs

//! Public deep-link surface.
//!
//! - `resolve_many`: strict; errors propagate once a batch runs out of retries.
//! - `resolve_one`: best effort; any failure yields the input URL unchanged.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Credentials, DeepLinkMap, PartnerConfig};
use crate::pipeline::{ResolveOptions, dispatch};
use crate::services::signer::{Clock, SystemClock};
use crate::services::{DeepLinkClient, PartnerApi, Signer};
use crate::utils::http::{HttpTransport, Transport};

/// Resolves raw product URLs into affiliate short-links.
#[derive(Clone)]
pub struct DeepLinkResolver {
    client: DeepLinkClient,
    credentials: Credentials,
}

impl DeepLinkResolver {
    /// Resolver over a fresh reqwest session.
    pub fn new(credentials: Credentials, config: &PartnerConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(
            credentials,
            config,
            transport,
            Arc::new(SystemClock),
        ))
    }

    /// Resolver over an arbitrary transport and signing clock.
    pub fn with_transport(
        credentials: Credentials,
        config: &PartnerConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let signer = Signer::new(credentials.clone(), clock, config.signed_date);
        let api = PartnerApi::new(transport, signer, &config.base_url);
        Self {
            client: DeepLinkClient::new(api),
            credentials,
        }
    }

    /// Resolve every URL; errors when credentials are missing or a batch
    /// exhausts its retries. Input with no non-blank URL returns an empty
    /// map without any request or credential check.
    pub async fn resolve_many(&self, urls: &[String], options: &ResolveOptions) -> Result<DeepLinkMap> {
        if urls.iter().all(|u| u.trim().is_empty()) {
            return Ok(DeepLinkMap::new());
        }
        self.credentials.ensure_present()?;
        dispatch(&self.client, urls, options).await
    }

    /// Short-link for `url`, or `url` itself on any failure or miss.
    pub async fn resolve_one(&self, url: &str, options: &ResolveOptions) -> String {
        match self.resolve_many(&[url.to_string()], options).await {
            Ok(map) => match map.get(url) {
                Some(short) => short.to_string(),
                None => {
                    log::warn!("No deep-link returned for {url}; keeping original");
                    url.to_string()
                }
            },
            Err(error) => {
                log::warn!("Deep-link resolution failed for {url}: {error}; keeping original");
                url.to_string()
            }
        }
    }
}
