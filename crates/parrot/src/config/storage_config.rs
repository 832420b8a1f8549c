use crate::{
    AppError, AppResult,
    config::{DEFAULT_STORAGE_BACKING, default_storage_backing},
};

use std::{panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Where the recorded clip lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    /// Clip held in memory, lost on exit.
    Memory,
    /// Clip persisted to a file, surviving restarts.
    File,
}

/// Clip storage selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backing: "memory" or "file".
    #[serde(default = "default_storage_backing")]
    pub backing: String,
    /// Clip file path when the backing is "file" (None = data directory).
    #[serde(default)]
    pub clip_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Parse the configured backing.
    #[track_caller]
    pub fn backing(&self) -> AppResult<Backing> {
        match self.backing.as_str() {
            "memory" => Ok(Backing::Memory),
            "file" => Ok(Backing::File),
            other => Err(AppError::ConfigError {
                reason: format!(
                    "Unknown storage backing {:?}, expected \"memory\" or \"file\"",
                    other
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Resolve the clip file path, falling back to the data directory.
    #[track_caller]
    pub fn resolved_clip_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.clip_path {
            return Ok(path.clone());
        }
        let proj_dirs =
            ProjectDirs::from("com", "parrot", "Parrot").ok_or_else(|| AppError::ConfigError {
                reason: "Failed to get data directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;
        Ok(proj_dirs.data_dir().join("clip.pcm"))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backing: DEFAULT_STORAGE_BACKING.to_string(),
            clip_path: None,
        }
    }
}
