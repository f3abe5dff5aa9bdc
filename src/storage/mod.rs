//! Storage for toolkit input and output files.
//!
//! Everything lives as CSV under one data directory; writes are atomic so a
//! failed run never leaves a half-written output behind.

pub mod local;

pub use local::{KEYWORD_HEADER, LocalStorage};

/// Harvested keywords, one comma-separated line.
pub const KEYWORDS_INPUT: &str = "keywords.csv";
/// Top informational keywords.
pub const KEYWORDS_GENERAL: &str = "keywords_general.csv";
/// Golden informational keywords.
pub const GOLDEN_KEYWORDS: &str = "golden_keywords.csv";
/// Golden shopping keywords.
pub const GOLDEN_SHOPPING_KEYWORDS: &str = "golden_shopping_keywords.csv";
/// Product seed rows.
pub const PRODUCTS_SEED: &str = "products_seed.csv";
/// Product seed rows with a `deeplink` column.
pub const PRODUCTS_SEED_RESOLVED: &str = "products_seed.resolved.csv";

/// Columns of `products_seed.csv`.
pub const SEED_HEADER: [&str; 5] = ["keyword", "product_name", "raw_url", "pros", "cons"];
/// Columns of `products_seed.resolved.csv`.
pub const RESOLVED_SEED_HEADER: [&str; 6] =
    ["keyword", "product_name", "raw_url", "pros", "cons", "deeplink"];
