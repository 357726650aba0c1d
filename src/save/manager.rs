//! Save manager for slot files on disk
//!
//! This module provides the SaveManager struct which handles:
//! - Mapping slot names to files in the save directory
//! - Atomic writes and raw reads of slot files
//! - Autosave timing
//! - Save file management (listing, deletion, autosave cleanup)
//!
//! It only moves bytes and `SaveFile`s around; capturing and restoring the
//! scene is the walker's job.

use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::atomic_io::write_atomic;
use super::codec;
use super::types::*;
use crate::config::SaveConfig;

const SAVE_EXTENSION: &str = "json";
const AUTOSAVE_PREFIX: &str = "autosave_";

pub struct SaveManager {
    save_directory: PathBuf,
    autosave_interval: f32,
    since_autosave: f32,
}

impl SaveManager {
    /// Creates a new SaveManager for the configured save directory
    ///
    /// The save directory will be created if it doesn't exist.
    pub fn new(config: &SaveConfig) -> Result<Self> {
        let save_dir = config.save_directory.clone();

        if !save_dir.exists() {
            fs::create_dir_all(&save_dir)?;
        }

        Ok(SaveManager {
            save_directory: save_dir,
            autosave_interval: config.autosave_interval_secs,
            since_autosave: 0.0,
        })
    }

    pub fn save_directory(&self) -> &Path {
        &self.save_directory
    }

    /// File path for a slot, after validating its name
    pub fn slot_path(&self, slot_name: &str) -> Result<PathBuf> {
        validate_slot_name(slot_name)?;
        Ok(self
            .save_directory
            .join(format!("{slot_name}.{SAVE_EXTENSION}")))
    }

    /// Writes encoded save bytes to a slot, replacing any previous save
    pub fn write_slot(&mut self, slot_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.slot_path(slot_name)?;
        write_atomic(&path, bytes)?;
        info!("Game saved to: {}", path.display());
        Ok(path)
    }

    /// Reads the raw bytes of a slot
    pub fn read_slot(&self, slot_name: &str) -> Result<Vec<u8>> {
        let path = self.slot_path(slot_name)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(SaveError::SlotNotFound(slot_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a save file exists for a given slot
    pub fn save_exists(&self, slot_name: &str) -> bool {
        self.slot_path(slot_name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    pub fn delete_slot(&mut self, slot_name: &str) -> Result<()> {
        let path = self.slot_path(slot_name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted save slot '{}'", slot_name);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(SaveError::SlotNotFound(slot_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List all readable save files, newest first
    ///
    /// Files that fail to decode are skipped with a warning.
    pub fn list_saves(&self) -> Result<Vec<SaveFileInfo>> {
        let mut saves = Vec::new();

        for (slot_name, path, modified) in self.slot_files()? {
            let save_file = fs::read(&path)
                .map_err(SaveError::from)
                .and_then(|bytes| codec::decode(&bytes));

            match save_file {
                Ok(save_file) => saves.push(SaveFileInfo {
                    slot_name,
                    modified,
                    metadata: save_file.metadata,
                }),
                Err(e) => warn!("Skipping unreadable save {}: {}", path.display(), e),
            }
        }

        saves.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.slot_name.cmp(&a.slot_name))
        });

        Ok(saves)
    }

    /// A fresh slot name for an autosave, based on the local time
    pub fn autosave_slot_name(&self) -> String {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let base = format!("{AUTOSAVE_PREFIX}{timestamp}");

        let mut name = base.clone();
        let mut n = 1;
        while self.save_exists(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        name
    }

    /// Delete old autosaves, keeping only the N most recent
    ///
    /// Returns how many files were removed.
    pub fn cleanup_autosaves(&mut self, keep_count: usize) -> Result<usize> {
        let mut autosaves: Vec<_> = self
            .slot_files()?
            .into_iter()
            .filter(|(slot_name, _, _)| slot_name.starts_with(AUTOSAVE_PREFIX))
            .collect();

        // Names embed the timestamp, so they break mtime ties in the right order
        autosaves.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| b.0.cmp(&a.0)));

        let mut removed = 0;
        for (slot_name, path, _) in autosaves.iter().skip(keep_count) {
            fs::remove_file(path)?;
            debug!("Removed old autosave '{}'", slot_name);
            removed += 1;
        }

        Ok(removed)
    }

    /// Advances the autosave timer by `dt` seconds
    ///
    /// Returns true once the interval has elapsed since the last autosave.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.since_autosave += dt.max(0.0);
        self.should_autosave()
    }

    /// Check if autosave is needed
    pub fn should_autosave(&self) -> bool {
        self.since_autosave >= self.autosave_interval
    }

    pub fn mark_autosaved(&mut self) {
        self.since_autosave = 0.0;
    }

    /// Every `<slot>.json` in the save directory with its modification time
    fn slot_files(&self) -> Result<Vec<(String, PathBuf, SystemTime)>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.save_directory)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }
            let Some(slot_name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_slot_name(slot_name).is_err() {
                continue;
            }

            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((slot_name.to_string(), path, modified));
        }

        Ok(files)
    }
}

/// Slot names become file names, so only `[A-Za-z0-9_-]` is allowed
pub fn validate_slot_name(slot_name: &str) -> Result<()> {
    let valid = !slot_name.is_empty()
        && slot_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(SaveError::InvalidSlotName(slot_name.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct SaveFileInfo {
    pub slot_name: String,
    pub modified: SystemTime,
    pub metadata: SaveMetadata,
}
