//! Configuration loading for pretcad.
//! Reads pretcad.toml from the current directory or the path in PRETCAD_CONFIG.
//! Every section is optional; a missing file yields the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{Result, ScreenerError};

pub const CONFIG_ENV: &str = "PRETCAD_CONFIG";
pub const API_BASE_ENV: &str = "PRETCAD_API_BASE";
pub const DEFAULT_CONFIG_FILE: &str = "pretcad.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreenerConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote screening service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Unset means no client-side timeout; the transport decides.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String { "https://pre-tcad-app.onrender.com".to_string() }

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), request_timeout_secs: None }
    }
}

/// Where the form lives and where a finished run navigates to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_current_page")]
    pub current_page: String,
    /// Resolved relative to `current_page`.
    #[serde(default = "default_results_page")]
    pub results_page: String,
}

fn default_current_page() -> String { "http://localhost:8000/index.html".to_string() }
fn default_results_page() -> String { "result.html".to_string() }

impl Default for PageConfig {
    fn default() -> Self {
        Self { current_page: default_current_page(), results_page: default_results_page() }
    }
}

/// Durable exchange storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf { PathBuf::from("pretcad_storage.json") }

impl Default for StorageConfig {
    fn default() -> Self { Self { path: default_storage_path() } }
}

mod tests;

impl ScreenerConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Otherwise PRETCAD_CONFIG is consulted,
    /// then `pretcad.toml`; if neither file exists the defaults are used.
    /// PRETCAD_API_BASE overrides `service.base_url` in every case.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => {
                let p = std::env::var(CONFIG_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
                if p.exists() {
                    Self::load_from(&p)?
                } else {
                    tracing::warn!(path = %p.display(), "No config file, using defaults");
                    Self::default()
                }
            }
        };

        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                config.service.base_url = base;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScreenerError::Config(format!(
                "Config file not found: {}", path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ScreenerError::Config(e.to_string()))
    }

    /// Check that both configured URLs parse.
    pub fn validate(&self) -> Result<()> {
        self.service_base()?;
        self.current_page()?;
        Ok(())
    }

    /// Service base address with a trailing slash, so endpoint names join
    /// underneath it rather than replacing its last segment.
    pub fn service_base(&self) -> Result<Url> {
        let mut base = self.service.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base).map_err(|e| {
            ScreenerError::Config(format!("service.base_url {:?}: {}", self.service.base_url, e))
        })
    }

    /// Page the results page is resolved against; it must be able to act as
    /// a base for relative links (so not `about:blank` or `data:` URLs).
    pub fn current_page(&self) -> Result<Url> {
        let page = Url::parse(&self.page.current_page).map_err(|e| {
            ScreenerError::Config(format!("page.current_page {:?}: {}", self.page.current_page, e))
        })?;
        if page.cannot_be_a_base() {
            return Err(ScreenerError::Config(format!(
                "page.current_page {:?}: cannot resolve relative pages against it",
                self.page.current_page
            )));
        }
        Ok(page)
    }
}
