//! Utility functions and helpers.

pub mod http;
pub mod url;

pub use self::url::{canonicalize, dedup_preserving_order};
