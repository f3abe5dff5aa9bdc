// src/services/signer.rs

//! CEA request signing for the partner API.
//!
//! The authorization header is
//! `CEA algorithm=HmacSHA256, access-key={ak}, signed-date={T}, signature={sig}`
//! where `sig` is the lowercase hex HMAC-SHA256 of `T ∥ METHOD ∥ path[?query]`
//! keyed by the secret. `T` is read once per request and appears verbatim in
//! both the header and the signed message.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{AppError, Result};
use crate::models::{Credentials, SignedDateStyle};

type HmacSha256 = Hmac<Sha256>;

/// Source of the signing instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Process wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Produces authorization headers for partner API requests.
#[derive(Clone)]
pub struct Signer {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    style: SignedDateStyle,
}

impl Signer {
    pub fn new(credentials: Credentials, clock: Arc<dyn Clock>, style: SignedDateStyle) -> Self {
        Self {
            credentials,
            clock,
            style,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sign a request at the clock's current instant.
    pub fn authorization(&self, method: &str, path_with_query: &str) -> Result<String> {
        self.sign_at(method, path_with_query, self.clock.now())
    }

    /// Sign a request at a given instant.
    ///
    /// `path_with_query` must carry the `?query` exactly as sent, or no `?`
    /// at all when the request has no query string.
    pub fn sign_at(&self, method: &str, path_with_query: &str, at: DateTime<Utc>) -> Result<String> {
        self.credentials.ensure_present()?;
        if !path_with_query.starts_with('/') {
            return Err(AppError::validation(format!(
                "signed path must start with '/': {path_with_query}"
            )));
        }

        let signed_date = self.style.format(at);
        let message = format!("{}{}{}", signed_date, method.to_uppercase(), path_with_query);

        let mut mac = HmacSha256::new_from_slice(self.credentials.secret_key().as_bytes())
            .map_err(|e| AppError::config(format!("Invalid secret key: {e}")))?;
        mac.update(message.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!(
            "CEA algorithm=HmacSHA256, access-key={}, signed-date={}, signature={}",
            self.credentials.access_key(),
            signed_date,
            signature
        ))
    }
}
