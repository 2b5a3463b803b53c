//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides the desktop `HttpClient` built on `reqwest`. The
//! gallery core talks to the storage provider and its token endpoint through
//! it; hosts embedding the core elsewhere inject their own client instead.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use bridge_traits::HttpClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
//!
//!     // Use in core configuration
//! }
//! ```

mod http;

pub use http::ReqwestHttpClient;
