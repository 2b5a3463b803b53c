//! # Gallery Module
//!
//! Folder indexing and lazy, windowed link resolution for a remote photo
//! folder.
//!
//! ## Overview
//!
//! A [`GallerySession`] hands out a remote folder's images in fixed-size
//! batches, newest first:
//!
//! 1. On first use the [`FolderIndexer`] walks the folder listing page by page,
//!    keeps image files (`.jpeg`, `.jpg`, `.png`, `.gif`) and sorts them by
//!    modification time. The resulting [`GalleryIndex`] is built once and
//!    shared read-only.
//! 2. Each call to [`GallerySession::next_batch`] slices the next window of the
//!    index and resolves every entry into a temporary URL concurrently.
//! 3. When the provider rejects the access token, the session refreshes it
//!    through the shared `CredentialManager` and retries once. One rejected
//!    token causes at most one refresh, however many requests saw it.
//!
//! The read offset advances only after a batch resolves, so a failed or
//! cancelled call can simply be repeated.

pub mod error;
pub mod filter;
pub mod indexer;
pub mod session;
pub mod types;

pub use error::{ErrorKind, GalleryError, Result};
pub use indexer::FolderIndexer;
pub use session::{GallerySession, SessionOptions};
pub use types::{FileReference, GalleryBatch, GalleryIndex, GalleryProgress, ResolvedImage};
