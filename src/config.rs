//! Runtime configuration for the save system
//!
//! Loaded from a JSON file or built from defaults. Missing fields in the
//! file fall back to their defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the save directory
pub const SAVE_DIR_ENV: &str = "ALCHEMIST_SAVE_DIR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub save_directory: PathBuf,

    /// Seconds of simulated time between autosaves
    pub autosave_interval_secs: f32,

    /// Autosave files kept by `cleanup_autosaves`
    pub autosaves_to_keep: usize,

    pub inventory_capacity: usize,
}

impl Default for SaveConfig {
    fn default() -> Self {
        SaveConfig {
            save_directory: default_save_directory(),
            autosave_interval_secs: 300.0,
            autosaves_to_keep: 3,
            inventory_capacity: 10,
        }
    }
}

impl SaveConfig {
    /// Loads configuration from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: SaveConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Defaults, with the save directory taken from `ALCHEMIST_SAVE_DIR` when set
    pub fn from_env() -> Self {
        let mut config = SaveConfig::default();
        if let Some(dir) = std::env::var_os(SAVE_DIR_ENV).filter(|dir| !dir.is_empty()) {
            config.save_directory = PathBuf::from(dir);
        }
        config
    }

    pub fn with_save_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_directory = dir.into();
        self
    }
}

fn default_save_directory() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("alchemist_save").join("saves"),
        None => PathBuf::from("saves"),
    }
}
