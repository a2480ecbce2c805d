use crate::search_box::{SearchBoxConfig, DEFAULT_DEBOUNCE_MS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub display: DisplayConfig,
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Text shown in the box while it is empty
    pub placeholder: String,

    /// Quiet period after the last keystroke before the address is updated
    pub debounce_ms: u64,

    /// Query parameter that carries the search term
    pub query_param: String,

    /// Query parameter reset to "1" whenever the search term changes
    pub page_param: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Title of the search box border
    pub title: String,

    /// Append "(typing...)" to the title while a commit is pending
    pub show_debounce_indicator: bool,

    /// Show recent log lines below the address
    pub show_log_panel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Address the app starts on, e.g. "/dashboard/invoices?query=lee"
    pub initial_address: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let defaults = SearchBoxConfig::default();
        Self {
            placeholder: defaults.placeholder,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            query_param: defaults.query_param,
            page_param: defaults.page_param,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Search".to_string(),
            show_debounce_indicator: true,
            show_log_panel: true,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            initial_address: "/".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, writing defaults if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config {}", path.display()))?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("query-search").join("config.toml"))
    }

    /// Settings for the search box component
    pub fn search_box_config(&self) -> SearchBoxConfig {
        SearchBoxConfig {
            placeholder: self.search.placeholder.clone(),
            debounce: Duration::from_millis(self.search.debounce_ms),
            query_param: self.search.query_param.clone(),
            page_param: self.search.page_param.clone(),
        }
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# query-search configuration
# Location: ~/.config/query-search/config.toml (Linux)
#           ~/Library/Application Support/query-search/config.toml (macOS)
#           %APPDATA%\query-search\config.toml (Windows)

[search]
# Text shown while the search box is empty
placeholder = "Search..."

# Milliseconds of no typing before the address is updated
debounce_ms = 300

# Query parameter holding the search term
query_param = "query"

# Query parameter reset to "1" on every new search
page_param = "page"

[display]
title = "Search"

# Show "(typing...)" in the title while an update is pending
show_debounce_indicator = true

# Show recent log lines under the address bar
show_log_panel = true

[location]
# Address to start from, query parameters included
initial_address = "/"
"#
        .to_string()
    }
}
