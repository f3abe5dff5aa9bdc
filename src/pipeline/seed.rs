// src/pipeline/seed.rs

//! Seed resolution: attach a deep-link to every row of a product seed file.

use crate::error::Result;
use crate::models::{ResolvedSeedRow, SeedRow};
use crate::pipeline::ResolveOptions;
use crate::services::DeepLinkResolver;
use crate::storage::{LocalStorage, RESOLVED_SEED_HEADER};
use crate::utils::dedup_preserving_order;

/// Counts reported by [`run_seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Rows read from the seed file
    pub rows: usize,
    /// Distinct URLs sent for conversion
    pub submitted: usize,
    /// Rows whose deep-link differs from the raw URL
    pub resolved: usize,
    /// Rows that already carried an affiliate short-link
    pub passed_through: usize,
}

/// Resolve `input` seed rows and write them with a `deeplink` column to `output`.
///
/// Unresolved rows keep their raw URL as the deep-link. Any batch failure
/// aborts the run before the output is written.
pub async fn run_seed(
    resolver: &DeepLinkResolver,
    storage: &LocalStorage,
    options: &ResolveOptions,
    input: &str,
    output: &str,
) -> Result<SeedSummary> {
    let rows: Vec<SeedRow> = storage.read_csv(input).await?;
    log::info!("Loaded {} seed row(s) from {}", rows.len(), input);

    let urls: Vec<String> = rows
        .iter()
        .filter(|row| !row.is_affiliate_link())
        .map(|row| row.raw_url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();

    let links = resolver.resolve_many(&urls, options).await?;

    let mut summary = SeedSummary {
        rows: rows.len(),
        submitted: dedup_preserving_order(&urls).len(),
        ..SeedSummary::default()
    };

    let resolved: Vec<ResolvedSeedRow> = rows
        .into_iter()
        .map(|row| {
            let url = row.raw_url.trim().to_string();
            let deeplink = if row.is_affiliate_link() {
                summary.passed_through += 1;
                url
            } else {
                let link = links.get_or_original(&url).to_string();
                if link != url {
                    summary.resolved += 1;
                }
                link
            };
            row.with_deeplink(deeplink)
        })
        .collect();

    storage
        .write_csv(output, &RESOLVED_SEED_HEADER, &resolved)
        .await?;
    log::info!(
        "Wrote {} row(s) to {} ({} resolved, {} already affiliate links)",
        resolved.len(),
        output,
        summary.resolved,
        summary.passed_through
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::*;
    use crate::models::{Credentials, PartnerConfig};
    use crate::pipeline::RetryPolicy;
    use crate::services::FixedClock;
    use crate::storage::{PRODUCTS_SEED, PRODUCTS_SEED_RESOLVED};
    use crate::utils::http::mock::MockTransport;

    const SEED: &str = "keyword,product_name,raw_url,pros,cons
fryer,Fryer 5L,https://www.coupang.com/vp/products/1,big,loud
fryer,Fryer 3L,https://link.coupang.com/a/old,small,
vacuum,Stick,,light,
vacuum,Robot,https://www.coupang.com/vp/products/2,smart,\"pricey, noisy\"
";

    fn resolver(transport: Arc<MockTransport>) -> DeepLinkResolver {
        DeepLinkResolver::with_transport(
            Credentials::new("ak", "sk"),
            &PartnerConfig::default(),
            transport,
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())),
        )
    }

    fn options() -> ResolveOptions {
        ResolveOptions {
            retry: RetryPolicy::immediate(2),
            ..ResolveOptions::default()
        }
    }

    #[tokio::test]
    async fn test_resolves_and_appends_column() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage.write_bytes(PRODUCTS_SEED, SEED.as_bytes()).await.unwrap();

        let transport = Arc::new(MockTransport::fixed(
            200,
            r#"{"data":[{"originUrl":"https://www.coupang.com/vp/products/1","shortenUrl":"https://link.coupang.com/a/new1"}]}"#,
        ));
        let summary = run_seed(
            &resolver(Arc::clone(&transport)),
            &storage,
            &options(),
            PRODUCTS_SEED,
            PRODUCTS_SEED_RESOLVED,
        )
        .await
        .unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                rows: 4,
                submitted: 2,
                resolved: 1,
                passed_through: 1,
            }
        );

        let body = transport.requests()[0].body.clone().unwrap();
        assert!(body.contains("products/1"));
        assert!(body.contains("products/2"));
        assert!(!body.contains("link.coupang.com"));

        let rows: Vec<ResolvedSeedRow> = storage.read_csv(PRODUCTS_SEED_RESOLVED).await.unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].deeplink, "https://link.coupang.com/a/new1");
        assert_eq!(rows[0].pros, "big");
        assert_eq!(rows[1].deeplink, "https://link.coupang.com/a/old");
        assert_eq!(rows[2].deeplink, "");
        assert_eq!(rows[3].deeplink, "https://www.coupang.com/vp/products/2");
        assert_eq!(rows[3].cons, "pricey, noisy");
    }

    #[tokio::test]
    async fn test_failure_writes_no_output() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage.write_bytes(PRODUCTS_SEED, SEED.as_bytes()).await.unwrap();

        let result = run_seed(
            &resolver(Arc::new(MockTransport::fixed(500, "gateway down"))),
            &storage,
            &options(),
            PRODUCTS_SEED,
            PRODUCTS_SEED_RESOLVED,
        )
        .await;

        assert!(result.is_err());
        assert!(!storage.path(PRODUCTS_SEED_RESOLVED).exists());
    }

    #[tokio::test]
    async fn test_only_affiliate_links_sends_nothing() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage
            .write_bytes(
                PRODUCTS_SEED,
                b"keyword,product_name,raw_url,pros,cons\na,b,https://link.coupang.com/a/x,,\n",
            )
            .await
            .unwrap();

        let transport = Arc::new(MockTransport::failing());
        let summary = run_seed(
            &resolver(Arc::clone(&transport)),
            &storage,
            &options(),
            PRODUCTS_SEED,
            PRODUCTS_SEED_RESOLVED,
        )
        .await
        .unwrap();

        assert_eq!(transport.call_count(), 0);
        assert_eq!(summary.passed_through, 1);
    }
}
