//! Save data types
//!
//! This module defines the data structures persisted by the save system.
//! Everything here is a plain DTO: it is built fresh on every save and
//! thrown away right after a load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::scene::Transform;

/// Current save file version
pub const CURRENT_SAVE_VERSION: u32 = 1;

/// Flat key/value state captured from one component
pub type StateMap = BTreeMap<String, String>;

/// Component state of one object, keyed by component kind
pub type ComponentStates = BTreeMap<String, StateMap>;

/// The root save file structure
///
/// Wraps the captured scene with versioning and metadata. There is
/// deliberately no wall-clock timestamp in here: saving an unchanged
/// world twice must produce byte-identical files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(default = "default_version")]
    pub version: u32,
    pub metadata: SaveMetadata,
    pub scene: SceneSave,
}

fn default_version() -> u32 {
    1
}

/// Metadata about the save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub game_version: String,
    pub slot_name: String,
    pub save_type: SaveType,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SaveType {
    Manual,
    Auto,
    QuickSave,
}

/// Root container for a captured scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSave {
    /// Root-level saveable objects, in discovery order
    pub root_objects: Vec<SaveNode>,

    /// Dynamically spawned pick-ups, re-instantiated on load
    #[serde(default)]
    pub world_items: Vec<WorldItemSave>,
}

impl SceneSave {
    /// Total number of nodes in the tree, roots and descendants
    pub fn node_count(&self) -> usize {
        self.root_objects.iter().map(SaveNode::subtree_len).sum()
    }
}

/// Saved state of a single object and its saveable children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveNode {
    pub id: String,

    /// Diagnostic label only, never used to resolve the node
    pub name: String,
    pub is_active: bool,

    pub position: Vec3Data,
    pub rotation: QuatData,
    pub scale: Vec3Data,

    #[serde(default)]
    pub component_state: ComponentStates,

    #[serde(default)]
    pub children: Vec<SaveNode>,
}

impl SaveNode {
    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SaveNode::subtree_len).sum::<usize>()
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position.to_array(),
            rotation: self.rotation.to_array(),
            scale: self.scale.to_array(),
        }
    }
}

/// A pick-up lying in the world at save time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldItemSave {
    pub item_id: String,
    pub position: Vec3Data,
    pub rotation: QuatData,
}

/// Serializable 3-component vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3Data {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3Data {
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3Data {
    fn from(v: [f32; 3]) -> Self {
        Vec3Data { x: v[0], y: v[1], z: v[2] }
    }
}

/// Serializable quaternion (x, y, z, w)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuatData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl QuatData {
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<[f32; 4]> for QuatData {
    fn from(q: [f32; 4]) -> Self {
        QuatData { x: q[0], y: q[1], z: q[2], w: q[3] }
    }
}

/// Whole-file errors for save/load operations
///
/// Per-node problems never show up here; they are recovered locally
/// and reported through `LoadReport`.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed save data: {0}")]
    Decode(String),

    #[error("could not encode save data: {0}")]
    Encode(String),

    #[error("save version {found} is newer than supported version {supported}")]
    VersionMismatch { found: u32, supported: u32 },

    #[error("no save found for slot '{0}'")]
    SlotNotFound(String),

    #[error("invalid slot name '{0}'")]
    InvalidSlotName(String),
}

pub type Result<T> = std::result::Result<T, SaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, children: Vec<SaveNode>) -> SaveNode {
        SaveNode {
            id: id.to_string(),
            name: id.to_string(),
            is_active: true,
            position: [0.0; 3].into(),
            rotation: [0.0, 0.0, 0.0, 1.0].into(),
            scale: [1.0; 3].into(),
            component_state: ComponentStates::new(),
            children,
        }
    }

    #[test]
    fn test_node_count_includes_descendants() {
        let scene = SceneSave {
            root_objects: vec![
                node("a", vec![node("b", vec![node("c", vec![])])]),
                node("d", vec![]),
            ],
            world_items: vec![],
        };

        assert_eq!(scene.node_count(), 4);
    }

    #[test]
    fn test_missing_version_defaults_to_one() {
        let json = r#"{
            "metadata": { "game_version": "0.1.0", "slot_name": "a", "save_type": "Manual" },
            "scene": { "root_objects": [] }
        }"#;

        let file: SaveFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.version, 1);
        assert!(file.scene.world_items.is_empty());
    }
}
