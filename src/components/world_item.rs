use log::{info, warn};
use std::any::Any;

use crate::inventory::{InventoryError, PlayerInventory};
use crate::item::ItemRegistry;
use crate::scene::{Component, ObjectId, Scene, Transform};

/// A pick-up lying in the world
///
/// World items are spawned at runtime, so they have no stable id and are
/// not part of the save tree. The save system records them separately and
/// re-spawns them from the item registry on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldItem {
    item_id: String,
}

impl WorldItem {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Spawns a pick-up for `item_id` as a new root object
    ///
    /// Returns `None` if the registry doesn't know the item.
    pub fn spawn(
        scene: &mut Scene,
        registry: &ItemRegistry,
        item_id: &str,
        transform: Transform,
    ) -> Option<ObjectId> {
        let Some(definition) = registry.get(item_id) else {
            warn!("Could not find item definition for world item ID: {}", item_id);
            return None;
        };

        let id = scene.spawn(definition.name.clone());
        scene.set_transform(id, transform).ok()?;
        scene
            .add_component(id, WorldItem { item_id: item_id.to_string() })
            .ok()?;
        Some(id)
    }

    /// Moves the item into the collector's inventory and removes it from the world
    ///
    /// If the inventory can't take it, the item stays where it is.
    pub fn collect(
        scene: &mut Scene,
        item: ObjectId,
        collector: ObjectId,
    ) -> Result<(), InventoryError> {
        let Some(item_id) = scene.component::<WorldItem>(item).map(|w| w.item_id.clone()) else {
            return Ok(());
        };
        let Some(inventory) = scene.component_mut::<PlayerInventory>(collector) else {
            return Ok(());
        };

        inventory.add_item(&item_id)?;
        info!("Collected {}", item_id);
        // item exists, checked above
        let _ = scene.destroy(item);
        Ok(())
    }
}

impl Component for WorldItem {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventQueue;
    use std::rc::Rc;

    #[test]
    fn test_spawn_unknown_item_fails() {
        let mut scene = Scene::new();
        let registry = ItemRegistry::create_default();

        let spawned = WorldItem::spawn(&mut scene, &registry, "nope", Transform::IDENTITY);
        assert!(spawned.is_none());
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn test_collect_moves_item_into_inventory() {
        let mut scene = Scene::new();
        let registry = Rc::new(ItemRegistry::create_default());
        let player = scene.spawn("Player");
        scene
            .add_component(player, PlayerInventory::new(10, Rc::clone(&registry), EventQueue::new()))
            .unwrap();

        let item = WorldItem::spawn(
            &mut scene,
            &registry,
            "item_herb_01",
            Transform::from_position([3.0, 0.0, 1.0]),
        )
        .unwrap();
        assert_eq!(scene.get(item).unwrap().name, "Silverleaf");

        WorldItem::collect(&mut scene, item, player).unwrap();

        assert!(!scene.contains(item));
        assert!(scene.component::<PlayerInventory>(player).unwrap().has_item("item_herb_01"));
    }
}
