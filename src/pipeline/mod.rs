//! Pipeline entry points for toolkit operations.
//!
//! - `dispatch`: Batch, retry and merge deep-link conversions
//! - `run_seed`: Attach deep-links to `products_seed.csv`
//! - `run_search`: Search products, optionally appending seed rows
//! - `prepare_keyword_lines`: Rank harvested keywords into CSV lists

pub mod dispatch;
pub mod keywords;
pub mod retry;
pub mod search;
pub mod seed;

pub use dispatch::{BatchResolver, ResolveOptions, dispatch};
pub use keywords::prepare_keyword_lines;
pub use retry::RetryPolicy;
pub use search::run_search;
pub use seed::{SeedSummary, run_seed};
