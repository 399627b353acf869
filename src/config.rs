//! User configuration and preferences

use crate::error::{GalleryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_autoplay() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Whether the welcome dialog has been shown
    #[serde(default)]
    pub welcome_shown: bool,
    /// Where downloads are saved when no `--download-dir` is given
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Launch the player as soon as a video or audio item is opened
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            welcome_shown: false,
            download_dir: None,
            autoplay: default_autoplay(),
        }
    }
}

impl UserConfig {
    /// Get the config file path (~/.config/galleria/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("galleria").join("config.json"))
    }

    fn default_path() -> Result<PathBuf> {
        Self::config_path().ok_or_else(|| {
            GalleryError::ConfigError("Could not determine config directory".to_string())
        })
    }

    /// Load config from file, or use defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            GalleryError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            GalleryError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GalleryError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            GalleryError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            GalleryError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}
