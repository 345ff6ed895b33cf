// src/config/mod.rs
//! Harness configuration: TOML file + env overrides.

pub mod credential;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use credential::has_credential;

pub const ENV_CONFIG_PATH: &str = "HARNESS_CONFIG_PATH";
pub const ENV_BACKEND_URL: &str = "HARNESS_BACKEND_URL";
pub const DEFAULT_CONFIG_PATH: &str = "config/harness.toml";

fn default_credential_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_sample_chars() -> usize {
    60
}
fn default_detail_chars() -> usize {
    50
}
fn default_preview_chars() -> usize {
    100
}

/// Truncation lengths used by the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_sample_chars")]
    pub sample_chars: usize,
    #[serde(default = "default_detail_chars")]
    pub detail_chars: usize,
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sample_chars: default_sample_chars(),
            detail_chars: default_detail_chars(),
            preview_chars: default_preview_chars(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Base URL of the sentiment/fetch backend. `None` means stub collaborators.
    #[serde(default)]
    pub backend_url: Option<String>,
    /// Name of the env var holding the paid-backend credential.
    #[serde(default = "default_credential_env")]
    pub credential_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            credential_env: default_credential_env(),
            timeout_secs: default_timeout_secs(),
            report: ReportConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: HarnessConfig = toml::from_str(s).context("parsing harness config")?;
        Ok(cfg.sanitized())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading harness config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve config:
    /// 1) explicit path (CLI)
    /// 2) $HARNESS_CONFIG_PATH
    /// 3) config/harness.toml
    /// 4) defaults
    ///
    /// `$HARNESS_BACKEND_URL` overrides `backend_url` in every case.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = if let Some(p) = explicit {
            Self::load_from(p)?
        } else if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default.exists() {
                Self::load_from(&default)?
            } else {
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            cfg.backend_url = Some(url);
        }
        Ok(cfg.sanitized())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn sanitized(mut self) -> Self {
        self.backend_url = self
            .backend_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        if self.credential_env.trim().is_empty() {
            self.credential_env = default_credential_env();
        }
        self.timeout_secs = self.timeout_secs.max(1);
        let r = &mut self.report;
        if r.sample_chars == 0 {
            r.sample_chars = default_sample_chars();
        }
        if r.detail_chars == 0 {
            r.detail_chars = default_detail_chars();
        }
        if r.preview_chars == 0 {
            r.preview_chars = default_preview_chars();
        }
        self
    }
}
