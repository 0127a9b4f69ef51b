use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub pager: PagerConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Tuning for the scroll pager state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Margin (scroll units) before an edge at which prefetch triggers
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    /// How long the scroll listener stays muted after a page change
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Fallback timeout for a load whose completion never arrives
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
    /// Scroll units per item row
    #[serde(default = "default_row_height")]
    pub row_height: u32,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            settle_ms: default_settle_ms(),
            load_timeout_ms: default_load_timeout_ms(),
            row_height: default_row_height(),
        }
    }
}

impl PagerConfig {
    #[inline]
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    #[inline]
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

/// Settings for the built-in demo page source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Total number of items across all pages
    #[serde(default = "default_total_items")]
    pub total_items: u32,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
    /// Simulated fetch latency in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Page shown first
    #[serde(default = "default_start_page")]
    pub start_page: u32,
    /// Pages whose first fetch fails
    #[serde(default)]
    pub flaky_pages: Vec<u32>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            total_items: default_total_items(),
            items_per_page: default_items_per_page(),
            latency_ms: default_latency_ms(),
            start_page: default_start_page(),
            flaky_pages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Lines moved per mouse wheel step
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u32,
    /// Mark the first row of each page in the gutter
    #[serde(default = "default_true")]
    pub show_page_markers: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            scroll_lines: default_scroll_lines(),
            show_page_markers: default_true(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagescroll")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> u32 {
    5
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_load_timeout_ms() -> u64 {
    3000
}

fn default_row_height() -> u32 {
    1
}

fn default_total_items() -> u32 {
    250
}

fn default_items_per_page() -> u32 {
    20
}

fn default_latency_ms() -> u64 {
    400
}

fn default_start_page() -> u32 {
    1
}

fn default_tick_rate() -> u64 {
    100
}

fn default_scroll_lines() -> u32 {
    3
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        if config.pager.row_height == 0 {
            return Err(crate::Error::Config(
                "pager.row_height must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pagescroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pagescroll")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("pagescroll.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
