//! # Core Configuration Module
//!
//! Provides configuration management for the gallery core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `GalleryConfig` holding the provider credentials, the folder to browse and
//! the pagination settings. Numeric settings and endpoint URLs are validated
//! when the config is built; credential values are not, the token endpoint is
//! the authority on those.
//!
//! ## Usage
//!
//! ### From the process environment
//!
//! ```ignore
//! use core_runtime::config::GalleryConfig;
//!
//! let config = GalleryConfig::from_env()?;
//! ```
//!
//! ### Explicit
//!
//! ```
//! use core_runtime::config::{GalleryConfig, ResolvePolicy};
//!
//! let config = GalleryConfig::builder()
//!     .refresh_token("refresh")
//!     .app_key("key")
//!     .app_secret("secret")
//!     .folder_path("/Photos")
//!     .window_size(12)
//!     .resolve_policy(ResolvePolicy::SkipFailed)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_limit, 20);
//! ```
//!
//! ## Environment variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `DROPBOX_REFRESH_TOKEN` | `refresh_token` |
//! | `DROPBOX_APP_KEY` | `app_key` |
//! | `DROPBOX_APP_SECRET` | `app_secret` |
//! | `DROPBOX_FOLDER_PATH` | `folder_path` |
//! | `GALLERY_PAGE_LIMIT` | `page_limit` |
//! | `GALLERY_WINDOW_SIZE` | `window_size` |
//! | `GALLERY_RESOLVE_POLICY` | `resolve_policy` (`strict` or `skip`) |

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

pub const ENV_REFRESH_TOKEN: &str = "DROPBOX_REFRESH_TOKEN";
pub const ENV_APP_KEY: &str = "DROPBOX_APP_KEY";
pub const ENV_APP_SECRET: &str = "DROPBOX_APP_SECRET";
pub const ENV_FOLDER_PATH: &str = "DROPBOX_FOLDER_PATH";
pub const ENV_PAGE_LIMIT: &str = "GALLERY_PAGE_LIMIT";
pub const ENV_WINDOW_SIZE: &str = "GALLERY_WINDOW_SIZE";
pub const ENV_RESOLVE_POLICY: &str = "GALLERY_RESOLVE_POLICY";

pub const DEFAULT_TOKEN_URL: &str = "https://api.dropbox.com/oauth2/token";
pub const DEFAULT_API_BASE: &str = "https://api.dropboxapi.com/2";
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Upper bound the listing endpoint accepts for `limit`.
pub const MAX_PAGE_LIMIT: u32 = 2000;

/// How a batch treats items whose link could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvePolicy {
    /// Any failed item fails the whole batch and the cursor stays put.
    #[default]
    Strict,
    /// Failed items are logged and dropped; the cursor advances past them.
    SkipFailed,
}

impl FromStr for ResolvePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ResolvePolicy::Strict),
            "skip" | "skip_failed" | "lenient" => Ok(ResolvePolicy::SkipFailed),
            other => Err(Error::InvalidSetting {
                key: ENV_RESOLVE_POLICY.to_string(),
                message: format!("expected 'strict' or 'skip', got '{}'", other),
            }),
        }
    }
}

/// Gallery configuration.
///
/// Use [`GalleryConfigBuilder`] or [`GalleryConfig::from_env`] to construct
/// instances.
#[derive(Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Long-lived refresh token issued to the app
    pub refresh_token: String,

    /// OAuth client id
    pub app_key: String,

    /// OAuth client secret
    pub app_secret: String,

    /// Folder to browse; empty means the account root
    pub folder_path: String,

    /// Entries requested per listing page
    pub page_limit: u32,

    /// Default number of images per `next_page` call
    pub window_size: usize,

    pub resolve_policy: ResolvePolicy,

    /// OAuth token endpoint
    pub token_url: String,

    /// Base URL of the RPC endpoints, without trailing slash
    pub api_base: String,
}

impl fmt::Debug for GalleryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryConfig")
            .field("refresh_token", &redacted(&self.refresh_token))
            .field("app_key", &self.app_key)
            .field("app_secret", &redacted(&self.app_secret))
            .field("folder_path", &self.folder_path)
            .field("page_limit", &self.page_limit)
            .field("window_size", &self.window_size)
            .field("resolve_policy", &self.resolve_policy)
            .field("token_url", &self.token_url)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl GalleryConfig {
    /// Creates a new builder for constructing a `GalleryConfig`.
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }

    /// Loads the configuration from the process environment.
    ///
    /// Unset credential variables become empty strings.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder()
            .refresh_token(lookup(ENV_REFRESH_TOKEN).unwrap_or_default())
            .app_key(lookup(ENV_APP_KEY).unwrap_or_default())
            .app_secret(lookup(ENV_APP_SECRET).unwrap_or_default())
            .folder_path(lookup(ENV_FOLDER_PATH).unwrap_or_default());

        if let Some(raw) = non_empty(lookup(ENV_PAGE_LIMIT)) {
            builder = builder.page_limit(parse_number(ENV_PAGE_LIMIT, &raw)?);
        }

        if let Some(raw) = non_empty(lookup(ENV_WINDOW_SIZE)) {
            builder = builder.window_size(parse_number(ENV_WINDOW_SIZE, &raw)?);
        }

        if let Some(raw) = non_empty(lookup(ENV_RESOLVE_POLICY)) {
            builder = builder.resolve_policy(raw.parse()?);
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Page limit is within `1..=2000`
    /// - Window size is greater than 0
    /// - Token URL and API base are absolute http(s) URLs
    pub fn validate(&self) -> Result<()> {
        if self.page_limit == 0 || self.page_limit > MAX_PAGE_LIMIT {
            return Err(Error::Config(format!(
                "Page limit must be between 1 and {}, got {}",
                MAX_PAGE_LIMIT, self.page_limit
            )));
        }

        if self.window_size == 0 {
            return Err(Error::Config(
                "Window size must be greater than 0".to_string(),
            ));
        }

        validate_url("token_url", &self.token_url)?;
        validate_url("api_base", &self.api_base)?;

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        Error::Config(format!("{} must be a positive integer, got '{}'", key, raw))
    })
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let parsed = Url::parse(value)
        .map_err(|e| Error::Config(format!("{} is not a valid URL ({}): {}", field, e, value)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::Config(format!(
            "{} must use http or https, got '{}'",
            field, scheme
        ))),
    }
}

/// Builder for constructing [`GalleryConfig`] instances.
///
/// Call [`build()`](GalleryConfigBuilder::build) to validate and create the
/// final config.
#[derive(Default)]
pub struct GalleryConfigBuilder {
    refresh_token: Option<String>,
    app_key: Option<String>,
    app_secret: Option<String>,
    folder_path: Option<String>,
    page_limit: Option<u32>,
    window_size: Option<usize>,
    resolve_policy: Option<ResolvePolicy>,
    token_url: Option<String>,
    api_base: Option<String>,
}

impl GalleryConfigBuilder {
    pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    pub fn app_key(mut self, key: impl Into<String>) -> Self {
        self.app_key = Some(key.into());
        self
    }

    pub fn app_secret(mut self, secret: impl Into<String>) -> Self {
        self.app_secret = Some(secret.into());
        self
    }

    /// Sets the folder to browse. An empty string or `/` selects the root.
    pub fn folder_path(mut self, path: impl Into<String>) -> Self {
        self.folder_path = Some(path.into());
        self
    }

    /// Sets the number of entries requested per listing page (default 20).
    pub fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Sets the default window used by `next_page` (default 10).
    pub fn window_size(mut self, size: usize) -> Self {
        self.window_size = Some(size);
        self
    }

    pub fn resolve_policy(mut self, policy: ResolvePolicy) -> Self {
        self.resolve_policy = Some(policy);
        self
    }

    /// Overrides the OAuth token endpoint.
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Overrides the RPC base URL. A trailing slash is stripped.
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = Some(url.into());
        self
    }

    /// Builds the final `GalleryConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(GalleryConfig)` on success, or `Error::Config` if a
    /// numeric setting is out of range or an endpoint URL is malformed.
    pub fn build(self) -> Result<GalleryConfig> {
        let config = GalleryConfig {
            refresh_token: self.refresh_token.unwrap_or_default(),
            app_key: self.app_key.unwrap_or_default(),
            app_secret: self.app_secret.unwrap_or_default(),
            folder_path: self.folder_path.unwrap_or_default(),
            page_limit: self.page_limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            window_size: self.window_size.unwrap_or(DEFAULT_WINDOW_SIZE),
            resolve_policy: self.resolve_policy.unwrap_or_default(),
            token_url: self
                .token_url
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_base: self
                .api_base
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        };

        config.validate()?;

        Ok(config)
    }
}
