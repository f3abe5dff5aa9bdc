// src/pipeline/dispatch.rs

//! Batch dispatch for deep-link resolution.
//!
//! Input is de-duplicated in order, cut into contiguous batches of at most
//! [`MAX_BATCH`] URLs and sent one batch at a time under the retry policy.
//! A batch that exhausts its attempts fails the whole call; partial results
//! are never returned from here.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{DeepLinkMap, PartnerConfig};
use crate::pipeline::RetryPolicy;
use crate::services::MAX_BATCH;
use crate::utils::dedup_preserving_order;

/// Per-call deep-link options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    pub sub_id: Option<String>,
    pub channel_id: Option<String>,
    pub retry: RetryPolicy,
    pub timeout: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            sub_id: None,
            channel_id: None,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl ResolveOptions {
    /// Options from configuration for a run started at `now`.
    pub fn from_config(config: &PartnerConfig, now: DateTime<Utc>) -> Self {
        Self {
            sub_id: config.sub_id_at(now),
            channel_id: config.channel_id.clone().filter(|c| !c.trim().is_empty()),
            retry: RetryPolicy::new(config.retries),
            timeout: config.timeout(),
        }
    }
}

/// Resolves a single batch of distinct URLs.
#[async_trait]
pub trait BatchResolver: Send + Sync {
    async fn resolve_batch(&self, batch: &[String], options: &ResolveOptions) -> Result<DeepLinkMap>;
}

/// Resolve `urls` batch by batch and merge the results.
pub async fn dispatch<R>(resolver: &R, urls: &[String], options: &ResolveOptions) -> Result<DeepLinkMap>
where
    R: BatchResolver + ?Sized,
{
    let unique = dedup_preserving_order(urls);
    let mut mapping = DeepLinkMap::new();
    if unique.is_empty() {
        return Ok(mapping);
    }

    let total = unique.len().div_ceil(MAX_BATCH);
    log::info!(
        "Resolving {} unique URL(s) in {} batch(es)",
        unique.len(),
        total
    );

    for (index, batch) in unique.chunks(MAX_BATCH).enumerate() {
        let context = format!("Deep-link batch {}/{}", index + 1, total);
        let partial = options
            .retry
            .run(&context, move |_| resolver.resolve_batch(batch, options))
            .await?;
        log::debug!(
            "{}: {} of {} URL(s) resolved",
            context,
            partial.len(),
            batch.len()
        );
        mapping.extend(partial);
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::AppError;

    /// Echoes every URL with a short-link; fails the first `failures` calls.
    struct RecordingResolver {
        failures: usize,
        batches: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingResolver {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                batches: Mutex::new(Vec::new()),
            }
        }

        fn batches(&self) -> Vec<Vec<String>> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BatchResolver for RecordingResolver {
        async fn resolve_batch(&self, batch: &[String], _: &ResolveOptions) -> Result<DeepLinkMap> {
            let call = {
                let mut batches = self.batches.lock().unwrap();
                batches.push(batch.to_vec());
                batches.len()
            };
            if call <= self.failures {
                return Err(AppError::transport("https://gateway.test", "read timed out"));
            }
            let mut map = DeepLinkMap::new();
            for url in batch {
                map.insert(url.clone(), format!("https://link.test/{url}"));
            }
            Ok(map)
        }
    }

    fn options(attempts: u32) -> ResolveOptions {
        ResolveOptions {
            retry: RetryPolicy::immediate(attempts),
            ..ResolveOptions::default()
        }
    }

    fn distinct(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://www.coupang.com/vp/p/{i}")).collect()
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let resolver = RecordingResolver::new(0);
        let map = dispatch(&resolver, &[], &options(3)).await.unwrap();
        assert!(map.is_empty());
        assert!(resolver.batches().is_empty());
    }

    #[tokio::test]
    async fn test_batches_are_bounded() {
        let resolver = RecordingResolver::new(0);
        let map = dispatch(&resolver, &distinct(120), &options(3)).await.unwrap();

        let sizes: Vec<usize> = resolver.batches().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
        assert_eq!(map.len(), 120);
    }

    #[tokio::test]
    async fn test_dedup_preserves_first_occurrence_order() {
        let resolver = RecordingResolver::new(0);
        let input: Vec<String> = ["c", "a", "c", "b", "a"].iter().map(|s| s.to_string()).collect();
        dispatch(&resolver, &input, &options(3)).await.unwrap();
        assert_eq!(resolver.batches(), vec![vec!["c", "a", "b"]]);
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let resolver = RecordingResolver::new(1);
        let map = dispatch(&resolver, &distinct(2), &options(3)).await.unwrap();
        assert_eq!(resolver.batches().len(), 2);
        assert_eq!(map.len(), 2);
    }

    #[tokio::test]
    async fn test_failures_below_budget_succeed() {
        let resolver = RecordingResolver::new(2);
        assert!(dispatch(&resolver, &distinct(1), &options(3)).await.is_ok());
    }

    #[tokio::test]
    async fn test_exhausted_budget_names_cause() {
        let resolver = RecordingResolver::new(3);
        let err = dispatch(&resolver, &distinct(1), &options(3)).await.unwrap_err();
        assert_eq!(resolver.batches().len(), 3);
        let message = err.to_string();
        assert!(message.contains("Deep-link batch 1/1"));
        assert!(message.contains("read timed out"));
    }

    #[tokio::test]
    async fn test_failed_batch_aborts_remaining() {
        // First batch succeeds, second exhausts two attempts.
        struct SecondBatchFails(Mutex<usize>);

        #[async_trait]
        impl BatchResolver for SecondBatchFails {
            async fn resolve_batch(&self, batch: &[String], _: &ResolveOptions) -> Result<DeepLinkMap> {
                let mut calls = self.0.lock().unwrap();
                *calls += 1;
                if *calls == 1 {
                    let mut map = DeepLinkMap::new();
                    map.insert(batch[0].clone(), "https://link.test/0");
                    Ok(map)
                } else {
                    Err(AppError::status(500, "boom"))
                }
            }
        }

        let resolver = SecondBatchFails(Mutex::new(0));
        let result = dispatch(&resolver, &distinct(60), &options(2)).await;
        assert!(result.is_err());
        assert_eq!(*resolver.0.lock().unwrap(), 3);
    }

    #[test]
    fn test_options_from_config() {
        let config = PartnerConfig {
            retries: 5,
            timeout_secs: 7,
            sub_id: Some("post-42".into()),
            channel_id: Some(" ".into()),
            ..PartnerConfig::default()
        };
        let options = ResolveOptions::from_config(&config, Utc::now());
        assert_eq!(options.retry.max_attempts, 5);
        assert_eq!(options.timeout, Duration::from_secs(7));
        assert_eq!(options.sub_id.as_deref(), Some("post-42"));
        assert_eq!(options.channel_id, None);
    }
}
