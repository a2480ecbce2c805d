use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        Ok(dirs::data_dir()
            .ok_or_else(|| anyhow!("Cannot determine data directory"))?
            .join("query-search"))
    }

    /// Directory for log files, falling back to the temp dir
    pub fn log_dir() -> PathBuf {
        Self::data_dir()
            .map(|dir| dir.join("logs"))
            .unwrap_or_else(|_| std::env::temp_dir().join("query-search"))
    }
}
