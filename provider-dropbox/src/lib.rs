//! # Dropbox Provider
//!
//! Implements the `StorageProvider` trait for Dropbox API v2.
//!
//! ## Overview
//!
//! This module provides:
//! - Folder listing with cursor continuation (`files/list_folder`,
//!   `files/list_folder/continue`)
//! - Temporary link resolution (`files/get_temporary_link`)
//! - Typed mapping of rejected credentials and missing paths onto
//!   `BridgeError::Unauthorized` and `BridgeError::NotFound`
//!
//! Every call is a JSON POST against the RPC endpoint with the access token
//! supplied by the caller as a bearer header.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::DropboxConnector;
pub use error::{DropboxError, Result};
