// src/config.rs

//! Configuration loading utilities.
//!
//! The TOML file is read first; a small set of `COUPANG_*` environment
//! variables then override it. Credentials come only from the environment.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Config, Credentials};

pub const ENV_ACCESS_KEY: &str = "COUPANG_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "COUPANG_SECRET_KEY";
pub const ENV_SUB_ID_PREFIX: &str = "COUPANG_SUB_ID_PREFIX";
pub const ENV_CHANNEL_ID: &str = "COUPANG_CHANNEL_ID";
pub const ENV_VERIFY_TLS: &str = "COUPANG_VERIFY_TLS";
pub const ENV_USER_AGENT: &str = "COUPANG_USER_AGENT";

/// Load configuration from a TOML file, then apply environment overrides.
///
/// Falls back to defaults if the file cannot be loaded.
pub fn load_config(path: &Path) -> Config {
    let mut config = Config::load_or_default(path);
    apply_env_overrides(&mut config, env_var);
    config
}

/// Apply `COUPANG_*` overrides through `lookup`. Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(prefix) = lookup(ENV_SUB_ID_PREFIX) {
        config.partner.sub_id_prefix = Some(prefix);
    }
    if let Some(channel) = lookup(ENV_CHANNEL_ID) {
        config.partner.channel_id = Some(channel);
    }
    if let Some(verify) = lookup(ENV_VERIFY_TLS) {
        config.partner.verify_tls = !matches!(
            verify.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        );
    }
    if let Some(user_agent) = lookup(ENV_USER_AGENT) {
        config.partner.user_agent = user_agent;
    }
}

/// Partner credentials from the process environment.
pub fn credentials_from_env() -> Result<Credentials> {
    credentials_from(env_var)
}

/// Partner credentials through `lookup`; both keys must be non-blank.
pub fn credentials_from<F>(lookup: F) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let access = lookup(ENV_ACCESS_KEY).map(|v| v.trim().to_string());
    let secret = lookup(ENV_SECRET_KEY).map(|v| v.trim().to_string());
    match (access, secret) {
        (Some(access), Some(secret)) if !access.is_empty() && !secret.is_empty() => {
            Ok(Credentials::new(access, secret))
        }
        _ => Err(AppError::MissingCredentials),
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
