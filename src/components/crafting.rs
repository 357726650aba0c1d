use log::{info, warn};
use std::any::Any;
use std::rc::Rc;

use super::station::IngredientStation;
use crate::events::{EventQueue, GameEvent};
use crate::inventory::{InventoryError, PlayerInventory};
use crate::item::{ItemRegistry, Recipe};
use crate::scene::{Component, ObjectId, Scene};

/// Finds the first known recipe that uses exactly the given ingredients
///
/// Linear scan over `known_recipes` in order. The ingredient count has to
/// match too, so extra items on the table block a craft.
pub fn find_matching_recipe<'r>(
    registry: &'r ItemRegistry,
    known_recipes: &[String],
    ingredients: &[String],
) -> Option<&'r Recipe> {
    known_recipes
        .iter()
        .filter_map(|id| registry.get(id)?.recipe())
        .find(|recipe| recipe.ingredients.len() == ingredients.len() && recipe.can_craft(ingredients))
}

/// Combines the items on its linked stations into a crafted item
///
/// Not saveable itself: the stations it reads from carry the state.
pub struct CraftingTable {
    stations: Vec<ObjectId>,
    registry: Rc<ItemRegistry>,
    events: EventQueue,
}

impl CraftingTable {
    pub fn new(stations: Vec<ObjectId>, registry: Rc<ItemRegistry>, events: EventQueue) -> Self {
        CraftingTable {
            stations,
            registry,
            events,
        }
    }

    pub fn stations(&self) -> &[ObjectId] {
        &self.stations
    }

    /// Tries to craft with the ingredients on the table's stations
    ///
    /// On a match the stations are cleared and the output goes to the
    /// player's inventory. Returns the crafted item id, or `None` if there
    /// was nothing to craft. An output that can't go into the inventory
    /// aborts before anything is consumed; learned recipes never need a slot.
    pub fn craft(
        scene: &mut Scene,
        table: ObjectId,
        player: ObjectId,
    ) -> Result<Option<String>, InventoryError> {
        let Some(crafting) = scene.component::<CraftingTable>(table) else {
            warn!("Object {} has no crafting table", table);
            return Ok(None);
        };
        let stations = crafting.stations.clone();
        let registry = Rc::clone(&crafting.registry);
        let events = crafting.events.clone();

        let ingredients: Vec<String> = stations
            .iter()
            .filter_map(|id| scene.component::<IngredientStation>(*id)?.current_item())
            .map(str::to_string)
            .collect();

        if ingredients.is_empty() {
            info!("No ingredients on the table!");
            return Ok(None);
        }

        let Some(inventory) = scene.component::<PlayerInventory>(player) else {
            warn!("Object {} has no inventory to craft into", player);
            return Ok(None);
        };

        let Some(recipe) = find_matching_recipe(&registry, inventory.recipes(), &ingredients) else {
            info!("No valid recipe found for the current ingredients");
            return Ok(None);
        };
        let output = recipe.output.clone();

        // The output has to fit before any ingredient is consumed
        let Some(output_item) = registry.get(&output) else {
            return Err(InventoryError::UnknownItem(output));
        };
        if !output_item.is_recipe() && inventory.is_full() {
            return Err(InventoryError::InventoryFull);
        }

        match scene.component_mut::<PlayerInventory>(player) {
            Some(inventory) => inventory.add_item(&output)?,
            None => return Ok(None),
        }

        for id in &stations {
            if let Some(station) = scene.component_mut::<IngredientStation>(*id) {
                station.clear();
            }
        }

        info!("Recipe match found! Crafted {}", output);
        events.push(GameEvent::ItemCrafted(output.clone()));
        Ok(Some(output))
    }
}

impl Component for CraftingTable {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
