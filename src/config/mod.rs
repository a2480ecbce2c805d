//! Configuration module
//!
//! Search box behaviour, display options and the starting address,
//! loaded from a TOML file in the platform config directory.

pub mod config;

pub use config::Config;
