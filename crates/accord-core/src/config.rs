//! Engine configuration.
//!
//! The namespace is an explicit configuration value threaded into the engine
//! at construction, not a module-level constant. It qualifies every emitted
//! event (`<namespace>.<entity>.<verb>`), which lets several deployments
//! share one event transport.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_namespace() -> String {
    "accord".to_string()
}

/// Configuration fixed at engine construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deployment namespace used to qualify emitted events.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text. Missing keys fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse engine config")
    }

    /// Load a config file, falling back to defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read engine config {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("parse engine config {}", path.display()))
    }
}
