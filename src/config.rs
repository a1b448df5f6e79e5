//! User configuration and preferences

use crate::domain::{FolderColor, SortBy};
use crate::error::{FolderKitError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserConfig {
    /// Color given to folders created without an explicit one
    pub default_color: FolderColor,
    /// Listing order when none is passed on the command line
    pub default_sort: SortBy,
    /// List in descending order by default
    pub reverse_sort: bool,
    /// Store file; defaults to the platform data directory
    pub data_file: Option<PathBuf>,
}

impl UserConfig {
    /// Get the config file path (~/.config/folderkit/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folderkit").join("config.json"))
    }

    /// Default store file (~/.local/share/folderkit/folders.json)
    pub fn default_data_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("folderkit").join("folders.json"))
    }

    /// The store file to use: the configured one, else the platform default
    pub fn data_path(&self) -> Option<PathBuf> {
        self.data_file.clone().or_else(Self::default_data_path)
    }

    /// Load config from file, or create default if doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            FolderKitError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            FolderKitError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            FolderKitError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FolderKitError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FolderKitError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            FolderKitError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}
