//! # Host Bridge Traits
//!
//! Platform abstraction traits that the gallery core depends on.
//!
//! ## Overview
//!
//! This crate defines the contract between the gallery core and the
//! environment it runs in. Each trait is a capability the core needs but does
//! not implement itself: talking HTTP, talking to the remote storage provider,
//! and forwarding logs to a host pipeline.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry policy
//!
//! ### Remote storage
//! - [`StorageProvider`](storage::StorageProvider) - Folder listing with cursor
//!   pagination and temporary link resolution
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Two
//! variants carry meaning the core acts on:
//!
//! - `Unauthorized` - the access credential was rejected; the caller may
//!   refresh it and retry once
//! - `NotFound` - the remote path no longer exists
//!
//! Implementations must map provider responses onto these variants instead of
//! folding them into `OperationFailed`.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single implementation can be
//! shared across the concurrent resolutions of one gallery window.

pub mod error;
pub mod http;
pub mod logging;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use storage::{EntryKind, FolderPage, RemoteEntry, StorageProvider};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
