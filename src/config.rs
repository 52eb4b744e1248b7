use crate::constants;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Run configuration passed to the fetcher and the pipeline.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_url: String,
    pub site_url_base: String,
    pub page_size: u32,
    pub output_path: PathBuf,
    pub timeout_seconds: u64,
    pub delay_ms: u64,
    /// Upper bound on pages requested; `None` pages until the API runs dry
    pub max_pages: Option<u32>,
    /// Pushgateway base URL; run metrics are pushed there when set
    pub pushgateway_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: constants::BASE_URL.to_string(),
            site_url_base: constants::SITE_URL_BASE.to_string(),
            page_size: constants::PAGE_SIZE,
            output_path: PathBuf::from(constants::OUTPUT_PATH),
            timeout_seconds: constants::TIMEOUT_SECONDS,
            delay_ms: constants::DELAY_MS,
            max_pages: None,
            pushgateway_url: None,
        }
    }
}

impl Config {
    /// Loads `path` if it exists, otherwise falls back to the compiled-in defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ScraperError::Config("base_url must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(ScraperError::Config("page_size must be at least 1".into()));
        }
        if self.max_pages == Some(0) {
            return Err(ScraperError::Config("max_pages must be at least 1 when set".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
