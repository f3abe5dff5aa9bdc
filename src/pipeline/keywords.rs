// src/pipeline/keywords.rs

//! Keyword preparation: rank the harvested keyword line into three CSV lists.

use crate::error::Result;
use crate::models::{KeywordConfig, KeywordSelection};
use crate::services::KeywordClassifier;
use crate::storage::{GOLDEN_KEYWORDS, GOLDEN_SHOPPING_KEYWORDS, KEYWORDS_GENERAL, LocalStorage};

/// Rank `config.input_file` and write the general, golden and golden-shopping
/// lists.
///
/// Returns `Ok(None)` without touching any output when the input is missing
/// or holds no keywords.
pub async fn prepare_keyword_lines(
    config: &KeywordConfig,
    storage: &LocalStorage,
) -> Result<Option<KeywordSelection>> {
    let keywords = storage.read_keyword_line(&config.input_file).await?;
    if keywords.is_empty() {
        log::warn!(
            "No keywords in {}; skipping keyword lists",
            storage.path(&config.input_file).display()
        );
        return Ok(None);
    }

    let classifier = KeywordClassifier::new()?;
    let buckets = classifier.rank(&keywords);
    let selection = KeywordSelection {
        general: buckets.top_informational(config.general_top_k),
        golden: buckets.top_informational(config.golden_top_k),
        golden_shopping: buckets.top_shopping(config.shopping_top_k),
    };

    storage
        .write_keyword_csv(KEYWORDS_GENERAL, &selection.general)
        .await?;
    storage
        .write_keyword_csv(GOLDEN_KEYWORDS, &selection.golden)
        .await?;
    storage
        .write_keyword_csv(GOLDEN_SHOPPING_KEYWORDS, &selection.golden_shopping)
        .await?;

    log::info!(
        "Ranked {} keyword(s): {} informational, {} shopping",
        keywords.len(),
        buckets.informational.len(),
        buckets.shopping.len()
    );
    Ok(Some(selection))
}
