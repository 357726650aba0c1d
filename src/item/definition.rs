use serde::{Deserialize, Serialize};

use super::properties::{ItemCategory, ItemKind, Recipe};

/// The blueprint for an item type
///
/// Inventories, stations and save files only ever hold item ids;
/// the definition is looked up in the `ItemRegistry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique identifier (used for lookups and saves)
    pub id: String,

    /// Display name shown in UI
    pub name: String,

    pub description: String,

    /// Trade value, 0..=999
    pub value: u32,

    pub category: ItemCategory,

    /// Item-specific behaviour
    pub kind: ItemKind,
}

impl ItemDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        value: u32,
        category: ItemCategory,
        kind: ItemKind,
    ) -> Self {
        ItemDefinition {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            value: value.min(999),
            category,
            kind,
        }
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        match &self.kind {
            ItemKind::Recipe(recipe) => Some(recipe),
            _ => None,
        }
    }

    pub fn is_recipe(&self) -> bool {
        matches!(self.kind, ItemKind::Recipe(_))
    }
}
