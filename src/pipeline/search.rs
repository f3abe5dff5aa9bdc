// src/pipeline/search.rs

//! Product search run: query the partner API and optionally grow a seed file.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::{ProductRecord, SearchQuery, SeedRow};
use crate::services::ProductSearchClient;
use crate::storage::{LocalStorage, SEED_HEADER};

/// Search products and, when `output` is set, append them as seed rows.
///
/// Rows whose URL is already present in `output` are not added twice.
pub async fn run_search(
    client: &ProductSearchClient,
    storage: &LocalStorage,
    query: &SearchQuery,
    output: Option<&str>,
) -> Result<Vec<ProductRecord>> {
    let products = client.search(query).await?;

    if let Some(output) = output {
        let mut rows: Vec<SeedRow> = if storage.path(output).exists() {
            storage.read_csv(output).await?
        } else {
            Vec::new()
        };
        let mut known: HashSet<String> = rows.iter().map(|r| r.raw_url.clone()).collect();

        let before = rows.len();
        for product in &products {
            if known.insert(product.product_url.clone()) {
                rows.push(SeedRow::from_product(&query.keyword, product));
            }
        }

        storage.write_csv(output, &SEED_HEADER, &rows).await?;
        log::info!(
            "Appended {} seed row(s) to {}",
            rows.len() - before,
            output
        );
    }

    Ok(products)
}
