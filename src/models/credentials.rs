//! Partner API key pair.

use std::fmt;

use crate::error::{AppError, Result};

/// Access identifier and secret for the partner API.
///
/// Not `Serialize`; `Debug` redacts the secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Both halves are non-blank.
    pub fn is_present(&self) -> bool {
        !self.access_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }

    /// Fail with [`AppError::MissingCredentials`] unless both halves are set.
    pub fn ensure_present(&self) -> Result<()> {
        if self.is_present() {
            Ok(())
        } else {
            Err(AppError::MissingCredentials)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
