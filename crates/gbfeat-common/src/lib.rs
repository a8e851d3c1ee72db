//! gbfeat Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the gbfeat workspace members.
//!
//! # Overview
//!
//! - **Error Handling**: [`GbfeatError`] and the [`Result`] alias used by the
//!   command-line front-end
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`], the
//!   single place where the global `tracing` subscriber is configured
//!
//! The parsing core (`gbfeat-parser`) depends on neither; it only emits
//! `tracing` events and returns its own error type.

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{GbfeatError, Result};
