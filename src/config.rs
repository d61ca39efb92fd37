//! Configuration Management
//!
//! Optional JSON configuration for gce-inventory. A missing file means
//! defaults; a malformed one is reported.

use crate::collector::join::DEFAULT_CONSOLE_BASE_URL;
use crate::collector::orchestrator::{DEFAULT_CONCURRENCY, DEFAULT_IMAGE_PROJECTS};
use crate::collector::CollectOptions;
use crate::gcp::client::DEFAULT_COMPUTE_BASE_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project used when neither the CLI nor the secret names one
    pub project_id: Option<String>,
    /// Parallel joins and group fetches per batch
    pub concurrency: usize,
    /// Compute Engine endpoint
    pub api_base_url: String,
    /// Public projects whose images are matched against boot disks
    pub public_image_projects: Vec<String>,
    /// Console endpoint used for instance links
    pub console_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: None,
            concurrency: DEFAULT_CONCURRENCY,
            api_base_url: DEFAULT_COMPUTE_BASE_URL.to_string(),
            public_image_projects: DEFAULT_IMAGE_PROJECTS.iter().map(|p| p.to_string()).collect(),
            console_base_url: DEFAULT_CONSOLE_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Directory holding the config file and the log
    pub fn config_dir() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            return config_dir.join("gce-inventory");
        }
        if let Some(home) = dirs::home_dir() {
            return home.join(".gce-inventory");
        }
        PathBuf::from(".gce-inventory")
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Invalid config {:?}", path))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        if config.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Batch options derived from this configuration
    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            concurrency: self.concurrency,
            image_projects: self.public_image_projects.clone(),
            console_base_url: self.console_base_url.clone(),
        }
    }
}
