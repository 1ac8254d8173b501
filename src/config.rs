use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::store::OrphanPolicy;

const APP_NAME: &str = "value-canvas";
const CONFIG_FILE: &str = "config.json";
const LOG_ENV: &str = "VALUE_CANVAS_LOG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanvasConfig {
    /// How loads treat features pointing at a step that is not in the snapshot.
    pub orphan_policy: OrphanPolicy,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            orphan_policy: OrphanPolicy::Reject,
            log_filter: "value_canvas=info".to_string(),
        }
    }
}

impl CanvasConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if the file doesn't exist or fails to parse.
    ///
    /// Runs before tracing is installed, so problems go to stderr directly.
    pub fn load() -> Self {
        let config = match config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env_overrides()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(filter) = std::env::var(LOG_ENV) {
            self.log_filter = filter;
        }
        self
    }
}

/// `<config_dir>/value-canvas/config.json`.
pub fn config_path() -> Result<PathBuf> {
    config_dir()
        .map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
        .context("No config directory on this platform")
}
