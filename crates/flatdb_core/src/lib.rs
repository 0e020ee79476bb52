//! # flatdb Core
//!
//! Embedded flat-file document store engine.
//!
//! This crate provides:
//! - A [`Store`] facade with `write`, `read`, `read_all` and `delete`
//! - Key-to-path resolution with traversal-safe name validation
//! - A per-collection lock registry serializing collection access
//! - Atomic write-then-rename record commits
//!
//! Records are plain pretty-printed JSON files under
//! `<root>/<collection>/<resource>.json`, encoded by the `flatdb_codec`
//! crate. There is no server process: link this crate and point it at a
//! directory.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod locks;
mod paths;
mod store;

pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use store::Store;

/// Crate version string, exposed for CLI and demo front ends.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
