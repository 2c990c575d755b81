//! # Karaoke Common Library
//!
//! Shared code for the karaoke scoring tools:
//! - Error types
//! - Bootstrap TOML configuration and config-file resolution
//! - Root folder resolution
//! - Log level parsing

pub mod config;
pub mod error;

pub use error::{Error, Result};
