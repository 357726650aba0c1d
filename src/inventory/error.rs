use thiserror::Error;

/// Errors that can occur during inventory operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Inventory is full (can't add more items)
    #[error("inventory is full")]
    InventoryFull,

    /// Item ID doesn't exist in registry
    #[error("invalid item ID: {0}")]
    UnknownItem(String),

    /// Item has no use effect
    #[error("{0} is not a usable item")]
    NotUsable(String),

    /// Tried to use or remove an item the player doesn't hold
    #[error("{0} is not in the inventory")]
    NotInInventory(String),
}
