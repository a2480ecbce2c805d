//! Utility helpers
//!
//! Logging setup and platform paths.

pub mod app_paths;
pub mod logging;
