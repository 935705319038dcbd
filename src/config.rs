//! Configuration handling for the lead form

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the endpoint base URL
pub const BASE_URL_ENV: &str = "LEAD_FORM_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_SUBMIT_PATH: &str = "/api/forms/immobiliare";
const DEFAULT_CONFIRMATION_PATH: &str = "/grazie";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// User configuration; every field falls back to a default
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormConfig {
    /// Origin the relative endpoint is resolved against
    pub base_url: Option<String>,
    /// Path of the lead endpoint
    pub submit_path: Option<String>,
    /// Where to navigate after a successful submission
    pub confirmation_path: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl FormConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("it", "creditplan", "lead-form")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the default location, then apply the environment
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_base_url_override(std::env::var(BASE_URL_ENV).ok()))
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Replace the base URL when a non-blank override is given
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.base_url = Some(url.trim().to_string());
        }
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn submit_path(&self) -> &str {
        self.submit_path.as_deref().unwrap_or(DEFAULT_SUBMIT_PATH)
    }

    pub fn confirmation_path(&self) -> &str {
        self.confirmation_path
            .as_deref()
            .unwrap_or(DEFAULT_CONFIRMATION_PATH)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
