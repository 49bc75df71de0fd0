//! Configuration module
//!
//! TOML settings for page size, sort policy, display and logging.

pub mod config;
