//! Service layer for the deep-link toolkit.
//!
//! This module contains the partner API clients:
//! - Request signing (`Signer`)
//! - Deep-link conversion (`DeepLinkClient`, `DeepLinkResolver`)
//! - Product search (`ProductSearchClient`)
//! - Keyword classification (`KeywordClassifier`)

pub mod deeplink;
pub mod keywords;
pub mod partner;
pub mod resolver;
pub mod search;
pub mod signer;

pub use deeplink::{DeepLinkClient, MAX_BATCH};
pub use keywords::KeywordClassifier;
pub use partner::{DEEPLINK_PATH, PartnerApi, SEARCH_PATH};
pub use resolver::DeepLinkResolver;
pub use search::ProductSearchClient;
pub use signer::{Clock, FixedClock, Signer, SystemClock};
