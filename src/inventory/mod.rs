// Inventory system module
//
// This module provides the player's inventory:
// - Bounded item list plus learned recipes
// - Save/restore as a comma-joined id list

pub mod error;
pub mod player;

// Re-export main types
pub use error::InventoryError;
pub use player::PlayerInventory;
