//! Save/Load system
//!
//! This module saves and restores a hierarchy of game objects:
//! - Stable ids for saveable objects, kept across sessions
//! - A per-component state contract of flat string pairs
//! - JSON save files (human-readable, debuggable), one per named slot
//! - Autosaves driven by the simulation tick
//!
//! # Architecture
//!
//! - `identity`: unique ids and the registry that keeps them unique
//! - `saveable`: Saveable trait for components
//! - `types`: Save data structures and error types
//! - `codec`: bytes <-> `SaveFile`, plus invariant value formatting
//! - `walker`: capture/restore of the scene tree
//! - `manager`: SaveManager for slot files
//! - `system`: SaveSystem, the save/load entry points
//!
//! # Example Usage
//!
//! ```ignore
//! let config = SaveConfig::from_env();
//! let registry = Rc::new(ItemRegistry::create_default());
//! let mut saves = SaveSystem::new(&config, registry)?;
//!
//! saves.save(&mut scene, "slot1")?;
//! let report = saves.load(&mut scene, "slot1")?;
//! ```

pub(crate) mod atomic_io;
pub mod codec;
pub mod identity;
pub mod manager;
pub mod saveable;
pub mod system;
pub mod types;
pub mod walker;

pub use identity::{IdentityRegistry, SaveableEntity};
pub use manager::{SaveFileInfo, SaveManager};
pub use saveable::Saveable;
pub use system::SaveSystem;
pub use types::*;
pub use walker::{LoadReport, capture_scene, restore_scene};
