use log::{info, warn};
use std::any::Any;
use std::rc::Rc;

use crate::inventory::{InventoryError, PlayerInventory};
use crate::item::{ItemCategory, ItemRegistry};
use crate::save::{Saveable, StateMap};
use crate::scene::Component;

const CURRENT_ITEM_KEY: &str = "currentItemId";

/// A pedestal holding at most one crafting ingredient
pub struct IngredientStation {
    current_item: Option<String>,
    registry: Rc<ItemRegistry>,
}

impl IngredientStation {
    pub fn new(registry: Rc<ItemRegistry>) -> Self {
        IngredientStation {
            current_item: None,
            registry,
        }
    }

    pub fn current_item(&self) -> Option<&str> {
        self.current_item.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.current_item.is_none()
    }

    /// Puts an item on the station
    ///
    /// Only ingredients are accepted, and only while the station is empty.
    /// Returns whether the item was placed.
    pub fn place_item(&mut self, item_id: &str) -> bool {
        if self.current_item.is_some() {
            return false;
        }

        match self.registry.get(item_id) {
            Some(item) if item.category == ItemCategory::Ingredient => {
                info!("Placed {} on station", item.name);
                self.current_item = Some(item_id.to_string());
                true
            }
            Some(item) => {
                warn!("{} is not an ingredient and cannot be placed here", item.name);
                false
            }
            None => {
                warn!("Unknown item {} cannot be placed here", item_id);
                false
            }
        }
    }

    /// Moves an item from the player's inventory onto the station
    ///
    /// The item only leaves the inventory if the station accepted it.
    pub fn place_from(
        &mut self,
        inventory: &mut PlayerInventory,
        item_id: &str,
    ) -> Result<bool, InventoryError> {
        if !inventory.has_item(item_id) {
            return Err(InventoryError::NotInInventory(item_id.to_string()));
        }
        if !self.place_item(item_id) {
            return Ok(false);
        }

        inventory.remove_item(item_id)?;
        Ok(true)
    }

    /// Hands the current item back to the player and empties the station
    ///
    /// If the inventory refuses it, the item stays on the station.
    pub fn return_to(&mut self, inventory: &mut PlayerInventory) -> Result<(), InventoryError> {
        let Some(item_id) = self.current_item.as_deref() else {
            return Ok(());
        };

        inventory.add_item(item_id)?;
        info!("Returned {} to the player", item_id);
        self.current_item = None;
        Ok(())
    }

    /// Removes and returns the current item
    pub fn clear(&mut self) -> Option<String> {
        self.current_item.take()
    }
}

impl Saveable for IngredientStation {
    fn kind(&self) -> &'static str {
        "IngredientStation"
    }

    /// Empty station captures an empty map
    fn capture_state(&self) -> StateMap {
        let mut state = StateMap::new();
        if let Some(item_id) = &self.current_item {
            state.insert(CURRENT_ITEM_KEY.to_string(), item_id.clone());
        }
        state
    }

    /// An absent key means the station was empty when saved
    fn restore_state(&mut self, state: &StateMap) {
        self.current_item = match state.get(CURRENT_ITEM_KEY) {
            Some(item_id) if self.registry.exists(item_id) => Some(item_id.clone()),
            Some(item_id) => {
                warn!(
                    "Could not find item definition with saved ID: {}. Station will be empty.",
                    item_id
                );
                None
            }
            None => None,
        };
    }
}

impl Component for IngredientStation {
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
    use crate::events::EventQueue;

    fn setup() -> (IngredientStation, PlayerInventory) {
        let registry = Rc::new(ItemRegistry::create_default());
        let station = IngredientStation::new(Rc::clone(&registry));
        let inventory = PlayerInventory::new(10, registry, EventQueue::new());
        (station, inventory)
    }

    #[test]
    fn test_only_ingredients_are_accepted() {
        let (mut station, _) = setup();
        assert!(!station.place_item("item_key_07"));
        assert!(station.place_item("item_herb_01"));
        assert!(!station.place_item("item_mushroom_01"));
        assert_eq!(station.current_item(), Some("item_herb_01"));
    }

    #[test]
    fn test_place_from_inventory_and_return() {
        let (mut station, mut inventory) = setup();
        inventory.add_item("item_herb_01").unwrap();

        assert!(station.place_from(&mut inventory, "item_herb_01").unwrap());
        assert!(!inventory.has_item("item_herb_01"));

        station.return_to(&mut inventory).unwrap();
        assert!(station.is_empty());
        assert!(inventory.has_item("item_herb_01"));
    }

    #[test]
    fn test_rejected_item_stays_in_inventory() {
        let (mut station, mut inventory) = setup();
        inventory.add_item("item_potion_01").unwrap();

        assert!(!station.place_from(&mut inventory, "item_potion_01").unwrap());
        assert!(inventory.has_item("item_potion_01"));
    }

    #[test]
    fn test_capture_empty_station_is_empty_map() {
        let (station, _) = setup();
        assert!(station.capture_state().is_empty());
    }

    #[test]
    fn test_restore_unknown_or_missing_empties_station() {
        let (mut station, _) = setup();
        station.place_item("item_herb_01");

        let mut state = StateMap::new();
        state.insert(CURRENT_ITEM_KEY.to_string(), "ghost_item".to_string());
        station.restore_state(&state);
        assert!(station.is_empty());

        state.insert(CURRENT_ITEM_KEY.to_string(), "item_mushroom_01".to_string());
        station.restore_state(&state);
        assert_eq!(station.current_item(), Some("item_mushroom_01"));

        station.restore_state(&StateMap::new());
        assert!(station.is_empty());
    }
}
