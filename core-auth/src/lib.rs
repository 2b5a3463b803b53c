//! # Authentication Module
//!
//! Credential manager for the remote storage provider.
//!
//! ## Overview
//!
//! The gallery authenticates with a long-lived refresh token issued to the
//! app. This crate exchanges that refresh token for a short-lived access token
//! at the provider's OAuth 2.0 token endpoint, caches the result, and replaces
//! it when a downstream call reports it invalid.
//!
//! ## Features
//!
//! - Refresh-token grant against a configurable token endpoint
//! - Lazily populated credential cache shared by every caller
//! - Single-flight refresh: concurrent callers that saw the same rejected
//!   token trigger one exchange between them
//! - Auth state event emission
//!
//! Access tokens carry no local expiry check; expiry is discovered when the
//! provider rejects a call.

pub mod error;
pub mod manager;
pub mod oauth;
pub mod types;

pub use error::{AuthError, Result};
pub use manager::CredentialManager;
pub use oauth::RefreshTokenExchange;
pub use types::{AccessToken, RefreshCredentials};
