//! # KiPipe Common Library
//!
//! Shared code for the KiPipe component pipeline:
//! - Error type used across crates
//! - Configuration loading (root folder, TOML, supplier credentials)
//! - Catalog database initialization

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
