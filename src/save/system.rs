//! Entry points tying the walker, codec and slot files together

use log::{error, info};
use std::path::PathBuf;
use std::rc::Rc;

use super::codec;
use super::manager::SaveManager;
use super::types::*;
use super::walker::{self, LoadReport};
use crate::config::SaveConfig;
use crate::item::ItemRegistry;
use crate::scene::Scene;

pub struct SaveSystem {
    manager: SaveManager,
    registry: Rc<ItemRegistry>,
    autosaves_to_keep: usize,
}

impl SaveSystem {
    pub fn new(config: &SaveConfig, registry: Rc<ItemRegistry>) -> Result<Self> {
        Ok(SaveSystem {
            manager: SaveManager::new(config)?,
            registry,
            autosaves_to_keep: config.autosaves_to_keep,
        })
    }

    pub fn manager(&self) -> &SaveManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut SaveManager {
        &mut self.manager
    }

    /// Captures the scene and writes it to `slot_name`
    pub fn save(&mut self, scene: &mut Scene, slot_name: &str) -> Result<PathBuf> {
        self.save_as(scene, slot_name, SaveType::Manual)
    }

    pub fn quick_save(&mut self, scene: &mut Scene) -> Result<PathBuf> {
        self.save_as(scene, "quicksave", SaveType::QuickSave)
    }

    /// Reads `slot_name` and applies it to the scene
    ///
    /// The file is fully read and decoded first; if that fails the scene
    /// is left untouched.
    pub fn load(&mut self, scene: &mut Scene, slot_name: &str) -> Result<LoadReport> {
        let bytes = self.manager.read_slot(slot_name)?;
        let save_file = codec::decode(&bytes)?;

        let report = walker::restore_scene(scene, &save_file.scene, &self.registry);
        info!(
            "Loaded slot '{}' ({} objects restored)",
            slot_name, report.restored
        );
        Ok(report)
    }

    /// Saves to a fresh autosave slot and prunes old ones
    pub fn autosave(&mut self, scene: &mut Scene) -> Result<PathBuf> {
        let slot_name = self.manager.autosave_slot_name();
        let path = self.save_as(scene, &slot_name, SaveType::Auto)?;
        self.manager.mark_autosaved();
        self.manager.cleanup_autosaves(self.autosaves_to_keep)?;
        Ok(path)
    }

    /// Advances the autosave timer; returns true when an autosave is due
    pub fn tick(&mut self, dt: f32) -> bool {
        self.manager.tick(dt)
    }

    /// Runs an autosave if one is due, logging instead of failing
    pub fn autosave_if_due(&mut self, scene: &mut Scene) -> Option<PathBuf> {
        if !self.manager.should_autosave() {
            return None;
        }
        match self.autosave(scene) {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Autosave failed: {}", e);
                // try again after another full interval
                self.manager.mark_autosaved();
                None
            }
        }
    }

    fn save_as(&mut self, scene: &mut Scene, slot_name: &str, save_type: SaveType) -> Result<PathBuf> {
        // reject bad names before touching the scene's ids
        self.manager.slot_path(slot_name)?;

        let save_file = SaveFile {
            version: CURRENT_SAVE_VERSION,
            metadata: SaveMetadata {
                game_version: env!("CARGO_PKG_VERSION").to_string(),
                slot_name: slot_name.to_string(),
                save_type,
            },
            scene: walker::capture_scene(scene),
        };

        let bytes = codec::encode(&save_file)?;
        self.manager.write_slot(slot_name, &bytes)
    }
}
