//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the gallery core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other crates depend on.
//! It establishes the logging conventions, the configuration surface read from
//! the process environment, and the event broadcasting used to report auth and
//! pagination progress to the host.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
