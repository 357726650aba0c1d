// Item system module
//
// This module provides the item data for the game:
// - Item definitions and their behaviour variants
// - Item registry for centralized lookup by id

pub mod definition;
pub mod properties;
pub mod registry;

// Re-export main types for convenient access
pub use definition::ItemDefinition;
pub use properties::{ItemCategory, ItemKind, Recipe, UseEffect};
pub use registry::{ItemRegistry, RegistryError};
