//! Credential value types.
//!
//! Both types hold secrets, so neither derives `Debug`; their manual
//! implementations print placeholders instead.

use chrono::{DateTime, Utc};
use core_runtime::config::GalleryConfig;
use std::fmt;

/// Short-lived bearer credential returned by the token endpoint.
///
/// Expiry is enforced by the provider and discovered only when a call is
/// rejected. `expires_in` is kept for reporting, never for local checks.
///
/// ```
/// use core_auth::AccessToken;
///
/// let token = AccessToken::new("sl.abc", Some(14400));
/// assert_eq!(token.as_str(), "sl.abc");
/// assert!(!format!("{:?}", token).contains("sl.abc"));
/// ```
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    issued_at: DateTime<Utc>,
    expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self {
            value: value.into(),
            issued_at: Utc::now(),
            expires_in,
        }
    }

    /// The raw bearer string, for the `Authorization` header only.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Lifetime reported by the token endpoint, in seconds.
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }
}

/// Two tokens are the same credential when their bearer strings match.
impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for AccessToken {}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Inputs of the refresh-token grant.
///
/// Empty values are allowed; the token endpoint rejects them.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct RefreshCredentials {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl RefreshCredentials {
    pub fn new(
        refresh_token: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(
            config.refresh_token.clone(),
            config.app_key.clone(),
            config.app_secret.clone(),
        )
    }
}

impl fmt::Debug for RefreshCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCredentials")
            .field("refresh_token", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}
