//! Application configuration persistence
//!
//! User preferences, stored as YAML in `~/.config/imagetile/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::history::DEFAULT_HISTORY_LIMIT;
use crate::model::Defaults;

/// Application configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Paper sizes and the layout a new poster starts with
    #[serde(default)]
    pub defaults: Defaults,
    /// Maximum number of undo steps kept per document
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Scale factor applied when exporting without an explicit `--scale`
    #[serde(default = "default_export_scale")]
    pub export_scale: f64,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_export_scale() -> f64 {
    1.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            history_limit: default_history_limit(),
            export_scale: default_export_scale(),
        }
    }
}

impl AppConfig {
    /// Load the user's config, or defaults when there is none
    pub fn load() -> Self {
        match crate::config_paths::config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no config directory, using default config");
                Self::default()
            }
        }
    }

    /// Load config from `path`. A missing, unreadable or invalid file
    /// yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring config: {}", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_yaml::from_str(&text).map_err(|e| e.to_string())
    }

    /// Write the config to the user's config file
    pub fn save(&self) -> Result<(), String> {
        match crate::config_paths::config_file() {
            Some(path) => self.save_to(&path),
            None => Err("No config directory available".to_string()),
        }
    }

    /// Write the config to `path`, creating missing parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        let yaml =
            serde_yaml::to_string(self).map_err(|e| format!("Cannot encode config: {}", e))?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Cannot create {}: {}", dir.display(), e))?;
        }
        std::fs::write(path, yaml)
            .map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
        tracing::info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Export scale, ignoring non-positive or non-finite values
    pub fn effective_export_scale(&self) -> f64 {
        if self.export_scale.is_finite() && self.export_scale > 0.0 {
            self.export_scale
        } else {
            default_export_scale()
        }
    }
}
