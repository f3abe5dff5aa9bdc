// src/lib.rs

//! Affiliate deep-link toolkit library

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
