// src/models/mod.rs

//! Domain models for the deep-link toolkit.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod credentials;
mod keyword;
mod link;
mod product;
mod seed;

// Re-export all public types
pub use config::{Config, KeywordConfig, PartnerConfig, SignedDateStyle};
pub use credentials::Credentials;
pub use keyword::{KeywordBuckets, KeywordSelection, ScoredKeyword};
pub use link::DeepLinkMap;
pub use product::{MAX_SEARCH_LIMIT, ProductRecord, SearchQuery, SortOrder};
pub use seed::{AFFILIATE_LINK_HOST, ResolvedSeedRow, SeedRow};
