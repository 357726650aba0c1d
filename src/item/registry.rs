use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::definition::ItemDefinition;
use super::properties::*;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("item '{0}' already registered")]
    DuplicateItem(String),

    #[error("could not read item file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse item file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Central registry of all item definitions
///
/// This is the single source of truth for what items exist in the game.
/// It is built once at startup and shared (`Rc<ItemRegistry>`) with every
/// component that has to turn a saved item id back into an item.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: HashMap<String, ItemDefinition>,
}

impl ItemRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with all built-in items pre-registered
    pub fn create_default() -> Self {
        let mut registry = Self::new();
        for item in base_items() {
            // Ids below are distinct, so this cannot collide
            let _ = registry.register(item);
        }
        registry
    }

    /// Loads item definitions from a JSON array on disk
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let definitions: Vec<ItemDefinition> = serde_json::from_str(&content)?;

        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition)?;
        }
        Ok(registry)
    }

    /// Registers a new item definition
    ///
    /// Returns error if an item with this ID already exists.
    pub fn register(&mut self, item: ItemDefinition) -> Result<(), RegistryError> {
        if self.items.contains_key(&item.id) {
            return Err(RegistryError::DuplicateItem(item.id));
        }

        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Gets an item definition by ID
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Returns true if an item with this ID exists
    pub fn exists(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns all item definitions, sorted by id
    pub fn all_items(&self) -> Vec<&ItemDefinition> {
        let mut items: Vec<_> = self.items.values().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }
}

// ======================================================================
// Item Registration - Base Game Items
// ======================================================================

fn base_items() -> Vec<ItemDefinition> {
    vec![
        ItemDefinition::new(
            "item_herb_01",
            "Silverleaf",
            "A fragrant herb. Used in crafting.",
            5,
            ItemCategory::Ingredient,
            ItemKind::Generic,
        ),
        ItemDefinition::new(
            "item_mushroom_01",
            "Glowcap",
            "A faintly glowing mushroom. Used in crafting.",
            8,
            ItemCategory::Ingredient,
            ItemKind::Generic,
        ),
        ItemDefinition::new(
            "item_potion_01",
            "Healing Potion",
            "Restores 25 health when consumed.",
            30,
            ItemCategory::Potion,
            ItemKind::Usable(UseEffect::Heal { amount: 25.0, over_time: None }),
        ),
        ItemDefinition::new(
            "item_potion_02",
            "Soothing Draught",
            "Restores 40 health over 5 seconds.",
            55,
            ItemCategory::Potion,
            ItemKind::Usable(UseEffect::Heal { amount: 40.0, over_time: Some(5.0) }),
        ),
        ItemDefinition::new(
            "item_key_07",
            "Rusty Key",
            "Opens something, somewhere.",
            1,
            ItemCategory::Key,
            ItemKind::Generic,
        ),
        ItemDefinition::new(
            "recipe_potion_01",
            "Recipe: Healing Potion",
            "Silverleaf and Glowcap make a Healing Potion.",
            15,
            ItemCategory::Recipe,
            ItemKind::Recipe(Recipe::new(&["item_herb_01", "item_mushroom_01"], "item_potion_01")),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_registry_resolves_base_items() {
        let registry = ItemRegistry::create_default();
        assert!(registry.exists("item_potion_01"));
        assert!(registry.exists("item_key_07"));
        assert!(registry.get("recipe_potion_01").unwrap().is_recipe());
        assert!(registry.get("no_such_item").is_none());
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = ItemRegistry::create_default();
        let duplicate = registry.get("item_herb_01").unwrap().clone();

        let result = registry.register(duplicate);
        assert!(matches!(result, Err(RegistryError::DuplicateItem(id)) if id == "item_herb_01"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        let items = vec![ItemDefinition::new(
            "item_feather",
            "Feather",
            "Light.",
            2,
            ItemCategory::Generic,
            ItemKind::Generic,
        )];
        std::fs::write(&path, serde_json::to_string(&items).unwrap()).unwrap();

        let registry = ItemRegistry::load_from_file(&path).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("item_feather").unwrap().name, "Feather");
    }

    #[test]
    fn test_all_items_sorted() {
        let registry = ItemRegistry::create_default();
        let ids: Vec<_> = registry.all_items().iter().map(|i| i.id.clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
