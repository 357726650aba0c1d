use log::{debug, info, warn};
use std::any::Any;
use std::rc::Rc;

use super::error::InventoryError;
use crate::components::PlayerHealth;
use crate::events::{EventQueue, GameEvent};
use crate::item::{ItemCategory, ItemKind, ItemRegistry};
use crate::save::{Saveable, StateMap};
use crate::scene::Component;

const INVENTORY_KEY: &str = "inventory";

/// Player inventory: a bounded list of items plus the recipes learned so far
///
/// Recipes are items too, but they go to their own list and never count
/// against the capacity. Every mutation pushes `GameEvent::InventoryChanged`.
pub struct PlayerInventory {
    items: Vec<String>,
    recipes: Vec<String>,
    capacity: usize,
    registry: Rc<ItemRegistry>,
    events: EventQueue,
}

impl PlayerInventory {
    /// Creates an empty inventory
    pub fn new(capacity: usize, registry: Rc<ItemRegistry>, events: EventQueue) -> Self {
        PlayerInventory {
            items: Vec::new(),
            recipes: Vec::new(),
            capacity,
            registry,
            events,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn recipes(&self) -> &[String] {
        &self.recipes
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.items.iter().any(|id| id == item_id)
    }

    /// Counts how many of a specific item are held
    pub fn count_item(&self, item_id: &str) -> usize {
        self.items.iter().filter(|id| *id == item_id).count()
    }

    pub fn knows_recipe(&self, recipe_id: &str) -> bool {
        self.recipes.iter().any(|id| id == recipe_id)
    }

    /// Adds an item, or learns it if it is a recipe
    pub fn add_item(&mut self, item_id: &str) -> Result<(), InventoryError> {
        let item = self
            .registry
            .get(item_id)
            .ok_or_else(|| InventoryError::UnknownItem(item_id.to_string()))?;

        if item.is_recipe() {
            if !self.knows_recipe(item_id) {
                self.recipes.push(item_id.to_string());
                info!("Learned recipe {}", item.name);
                self.events.push(GameEvent::InventoryChanged);
            }
            return Ok(());
        }

        if self.is_full() {
            info!("Inventory is full, could not add {}", item.name);
            return Err(InventoryError::InventoryFull);
        }

        self.items.push(item_id.to_string());
        info!("Added {} to inventory", item.name);
        debug!("{}", describe_category(item.category));
        self.events.push(GameEvent::InventoryChanged);
        Ok(())
    }

    /// Removes one instance of an item
    pub fn remove_item(&mut self, item_id: &str) -> Result<(), InventoryError> {
        let index = self
            .items
            .iter()
            .position(|id| id == item_id)
            .ok_or_else(|| InventoryError::NotInInventory(item_id.to_string()))?;

        self.items.remove(index);
        debug!("Removed {} from inventory", item_id);
        self.events.push(GameEvent::InventoryChanged);
        Ok(())
    }

    /// Uses an item on the player, consuming it
    pub fn use_item(&mut self, item_id: &str, health: &mut PlayerHealth) -> Result<(), InventoryError> {
        if !self.has_item(item_id) {
            return Err(InventoryError::NotInInventory(item_id.to_string()));
        }

        let registry = Rc::clone(&self.registry);
        let item = registry
            .get(item_id)
            .ok_or_else(|| InventoryError::UnknownItem(item_id.to_string()))?;

        match &item.kind {
            ItemKind::Usable(effect) => {
                health.apply_effect(effect);
                self.remove_item(item_id)
            }
            ItemKind::Generic | ItemKind::Recipe(_) => {
                warn!("{} is not a usable item", item.name);
                Err(InventoryError::NotUsable(item_id.to_string()))
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recipes.clear();
        self.events.push(GameEvent::InventoryChanged);
    }
}

fn describe_category(category: ItemCategory) -> &'static str {
    match category {
        ItemCategory::Ingredient => "This is an ingredient. It can be used for crafting.",
        ItemCategory::Potion => "This is a potion. It can be consumed for an effect.",
        ItemCategory::Key => "This is a key. It can be used to unlock something.",
        ItemCategory::Recipe => "This is a recipe. It can be used to craft something.",
        ItemCategory::Generic => "This is a generic item with no special category.",
    }
}

impl Saveable for PlayerInventory {
    fn kind(&self) -> &'static str {
        "PlayerInventory"
    }

    /// Items first, then recipes, as one comma-joined id list
    fn capture_state(&self) -> StateMap {
        let ids: Vec<&str> = self
            .items
            .iter()
            .chain(self.recipes.iter())
            .map(String::as_str)
            .collect();

        let mut state = StateMap::new();
        state.insert(INVENTORY_KEY.to_string(), ids.join(","));
        state
    }

    fn restore_state(&mut self, state: &StateMap) {
        let Some(saved) = state.get(INVENTORY_KEY) else {
            return;
        };

        self.items.clear();
        self.recipes.clear();

        for id in saved.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            match self.registry.get(id) {
                Some(item) if item.is_recipe() => {
                    if !self.recipes.iter().any(|r| r == id) {
                        self.recipes.push(id.to_string());
                    }
                }
                Some(_) if self.items.len() >= self.capacity => {
                    warn!("Inventory full while loading, dropped item {}", id);
                }
                Some(_) => self.items.push(id.to_string()),
                None => warn!("Could not find item definition with ID: {}", id),
            }
        }

        info!(
            "Inventory loaded with {} items and {} known recipes",
            self.items.len(),
            self.recipes.len()
        );
        self.events.push(GameEvent::InventoryChanged);
    }
}

impl Component for PlayerInventory {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_saveable(&self) -> Option<&dyn Saveable> {
        Some(self)
    }

    fn as_saveable_mut(&mut self) -> Option<&mut dyn Saveable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(capacity: usize) -> (PlayerInventory, EventQueue) {
        let events = EventQueue::new();
        let registry = Rc::new(ItemRegistry::create_default());
        (PlayerInventory::new(capacity, registry, events.clone()), events)
    }

    #[test]
    fn test_capture_joins_ids_in_order() {
        let (mut inv, _) = inventory(10);
        inv.add_item("item_potion_01").unwrap();
        inv.add_item("item_key_07").unwrap();

        let state = inv.capture_state();
        assert_eq!(state.get("inventory").unwrap(), "item_potion_01,item_key_07");
    }

    #[test]
    fn test_capture_empty_inventory() {
        let (inv, _) = inventory(10);
        assert_eq!(inv.capture_state().get("inventory").unwrap(), "");
    }

    #[test]
    fn test_restore_repopulates_and_notifies_once() {
        let (mut inv, events) = inventory(10);
        let mut state = StateMap::new();
        state.insert("inventory".to_string(), "item_potion_01,item_key_07".to_string());

        inv.restore_state(&state);

        assert_eq!(inv.items(), ["item_potion_01", "item_key_07"]);
        assert_eq!(events.drain(), vec![GameEvent::InventoryChanged]);
    }

    #[test]
    fn test_restore_separates_recipes_and_skips_unknown() {
        let (mut inv, _) = inventory(10);
        let mut state = StateMap::new();
        state.insert(
            "inventory".to_string(),
            "item_herb_01,recipe_potion_01,bogus_item".to_string(),
        );

        inv.restore_state(&state);

        assert_eq!(inv.items(), ["item_herb_01"]);
        assert_eq!(inv.recipes(), ["recipe_potion_01"]);
    }

    #[test]
    fn test_restore_empty_string_clears() {
        let (mut inv, events) = inventory(10);
        inv.add_item("item_herb_01").unwrap();
        events.drain();

        let mut state = StateMap::new();
        state.insert("inventory".to_string(), String::new());
        inv.restore_state(&state);

        assert!(inv.items().is_empty());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_restore_without_key_leaves_inventory_alone() {
        let (mut inv, events) = inventory(10);
        inv.add_item("item_herb_01").unwrap();
        events.drain();

        inv.restore_state(&StateMap::new());

        assert_eq!(inv.items(), ["item_herb_01"]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_add_item_respects_capacity() {
        let (mut inv, _) = inventory(2);
        inv.add_item("item_herb_01").unwrap();
        inv.add_item("item_herb_01").unwrap();

        assert_eq!(inv.add_item("item_herb_01"), Err(InventoryError::InventoryFull));
        // Recipes don't take a slot
        assert!(inv.add_item("recipe_potion_01").is_ok());
        assert_eq!(inv.count_item("item_herb_01"), 2);
    }

    #[test]
    fn test_add_unknown_item_fails() {
        let (mut inv, events) = inventory(10);
        let result = inv.add_item("dragon_egg");

        assert_eq!(result, Err(InventoryError::UnknownItem("dragon_egg".to_string())));
        assert!(events.is_empty());
    }

    #[test]
    fn test_recipes_are_deduplicated() {
        let (mut inv, _) = inventory(10);
        inv.add_item("recipe_potion_01").unwrap();
        inv.add_item("recipe_potion_01").unwrap();
        assert_eq!(inv.recipes().len(), 1);
    }

    #[test]
    fn test_use_item_heals_and_consumes() {
        let (mut inv, _) = inventory(10);
        let mut health = PlayerHealth::new(100.0, EventQueue::new());
        health.take_damage(50.0);
        inv.add_item("item_potion_01").unwrap();

        inv.use_item("item_potion_01", &mut health).unwrap();

        assert_eq!(health.current(), 75.0);
        assert!(!inv.has_item("item_potion_01"));
    }

    #[test]
    fn test_use_non_usable_item_fails() {
        let (mut inv, _) = inventory(10);
        let mut health = PlayerHealth::new(100.0, EventQueue::new());
        inv.add_item("item_key_07").unwrap();

        let result = inv.use_item("item_key_07", &mut health);
        assert_eq!(result, Err(InventoryError::NotUsable("item_key_07".to_string())));
        assert!(inv.has_item("item_key_07"));
    }
}
