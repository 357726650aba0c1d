use std::fs;
use std::rc::Rc;

use alchemist_save::SaveConfig;
use alchemist_save::components::{IngredientStation, PlayerController, PlayerHealth, TreasureChest};
use alchemist_save::events::EventQueue;
use alchemist_save::inventory::PlayerInventory;
use alchemist_save::item::ItemRegistry;
use alchemist_save::save::{SaveError, SaveSystem, codec};
use alchemist_save::scene::{ObjectId, Scene, Transform};

struct Session {
    scene: Scene,
    player: ObjectId,
    chest: ObjectId,
    station: ObjectId,
}

/// Same layout every time, like a level loaded from disk
fn level(registry: &Rc<ItemRegistry>) -> Session {
    let events = EventQueue::new();
    let mut scene = Scene::new();

    let player = scene.spawn("Player");
    scene.make_saveable_with_id(player, "player").unwrap();
    scene.add_component(player, PlayerController::new([0.0; 3], 5.0)).unwrap();
    scene.add_component(player, PlayerHealth::new(100.0, events.clone())).unwrap();
    scene
        .add_component(player, PlayerInventory::new(10, Rc::clone(registry), events.clone()))
        .unwrap();

    let room = scene.spawn("Room");
    scene.make_saveable_with_id(room, "room").unwrap();
    let chest = scene.spawn_child(room, "Chest").unwrap();
    scene.make_saveable_with_id(chest, "chest").unwrap();
    scene.add_component(chest, TreasureChest::new(events.clone())).unwrap();
    let station = scene.spawn_child(room, "Station").unwrap();
    scene.make_saveable_with_id(station, "station").unwrap();
    scene
        .add_component(station, IngredientStation::new(Rc::clone(registry)))
        .unwrap();

    Session {
        scene,
        player,
        chest,
        station,
    }
}

fn save_system(dir: &std::path::Path, registry: &Rc<ItemRegistry>) -> SaveSystem {
    let config = SaveConfig::default().with_save_directory(dir);
    SaveSystem::new(&config, Rc::clone(registry)).unwrap()
}

#[test]
fn test_progress_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Rc::new(ItemRegistry::create_default());

    {
        let mut saves = save_system(dir.path(), &registry);
        let mut s = level(&registry);

        s.scene
            .component_mut::<PlayerController>(s.player)
            .unwrap()
            .teleport([1.5, 0.0, -2.25]);
        s.scene.component_mut::<PlayerHealth>(s.player).unwrap().take_damage(30.0);
        {
            let inventory = s.scene.component_mut::<PlayerInventory>(s.player).unwrap();
            inventory.add_item("item_key_07").unwrap();
            inventory.add_item("recipe_potion_01").unwrap();
        }
        {
            let chest = s.scene.component_mut::<TreasureChest>(s.chest).unwrap();
            chest.take_damage(50);
            assert!(chest.activate());
        }
        assert!(
            s.scene
                .component_mut::<IngredientStation>(s.station)
                .unwrap()
                .place_item("item_herb_01")
        );
        s.scene
            .set_transform(s.chest, Transform::from_position([2.0, 0.0, 0.0]))
            .unwrap();

        saves.save(&mut s.scene, "slot1").unwrap();
    }

    let mut saves = save_system(dir.path(), &registry);
    let mut s = level(&registry);
    let report = saves.load(&mut s.scene, "slot1").unwrap();

    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.restored, 4);

    let scene = &s.scene;
    assert_eq!(
        scene.component::<PlayerController>(s.player).unwrap().position(),
        [1.5, 0.0, -2.25]
    );
    assert_eq!(scene.component::<PlayerHealth>(s.player).unwrap().current(), 70.0);
    let inventory = scene.component::<PlayerInventory>(s.player).unwrap();
    assert_eq!(inventory.items(), ["item_key_07".to_string()]);
    assert!(inventory.knows_recipe("recipe_potion_01"));
    let chest = scene.component::<TreasureChest>(s.chest).unwrap();
    assert!(chest.is_open());
    assert_eq!(chest.current_health(), 0);
    assert_eq!(scene.transform(s.chest).unwrap().position, [2.0, 0.0, 0.0]);
    assert_eq!(
        scene.component::<IngredientStation>(s.station).unwrap().current_item(),
        Some("item_herb_01")
    );
}

#[test]
fn test_removed_object_is_reported_and_the_rest_loads() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Rc::new(ItemRegistry::create_default());
    let mut saves = save_system(dir.path(), &registry);

    let mut s = level(&registry);
    saves.save(&mut s.scene, "slot1").unwrap();

    // A later version of the level dropped the room and everything in it
    let mut s = level(&registry);
    let room = s.scene.find_by_name("Room").unwrap();
    s.scene.destroy(room).unwrap();
    s.scene.component_mut::<PlayerHealth>(s.player).unwrap().take_damage(10.0);

    let report = saves.load(&mut s.scene, "slot1").unwrap();

    assert_eq!(report.unresolved, vec!["room".to_string()]);
    assert_eq!(report.restored, 1);
    assert_eq!(s.scene.component::<PlayerHealth>(s.player).unwrap().current(), 100.0);
}

#[test]
fn test_hand_written_save_with_comma_decimals() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Rc::new(ItemRegistry::create_default());
    let mut saves = save_system(dir.path(), &registry);

    let json = r#"{
        "metadata": { "game_version": "0.0.1", "slot_name": "legacy", "save_type": "Manual" },
        "scene": {
            "root_objects": [
                {
                    "id": "player",
                    "name": "Player",
                    "is_active": true,
                    "position": { "x": 0.0, "y": 0.0, "z": 0.0 },
                    "rotation": { "x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0 },
                    "scale": { "x": 1.0, "y": 1.0, "z": 1.0 },
                    "component_state": {
                        "PlayerHealth": { "currentHealth": "42,5", "maxHealth": "100" },
                        "Jetpack": { "fuel": "3" }
                    },
                    "children": []
                }
            ]
        }
    }"#;
    fs::write(dir.path().join("legacy.json"), json).unwrap();

    let mut s = level(&registry);
    let report = saves.load(&mut s.scene, "legacy").unwrap();

    assert_eq!(s.scene.component::<PlayerHealth>(s.player).unwrap().current(), 42.5);
    assert_eq!(
        report.missing_contracts,
        vec![("player".to_string(), "Jetpack".to_string())]
    );
}

#[test]
fn test_future_version_is_rejected_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Rc::new(ItemRegistry::create_default());
    let mut saves = save_system(dir.path(), &registry);

    let mut s = level(&registry);
    let path = saves.save(&mut s.scene, "slot1").unwrap();
    let mut save_file = codec::decode(&fs::read(&path).unwrap()).unwrap();
    save_file.version += 1;
    fs::write(&path, serde_json::to_vec(&save_file).unwrap()).unwrap();

    s.scene.component_mut::<PlayerHealth>(s.player).unwrap().take_damage(10.0);
    let result = saves.load(&mut s.scene, "slot1");

    assert!(matches!(result, Err(SaveError::VersionMismatch { .. })));
    assert_eq!(s.scene.component::<PlayerHealth>(s.player).unwrap().current(), 90.0);
}

#[test]
fn test_missing_slot() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Rc::new(ItemRegistry::create_default());
    let mut saves = save_system(dir.path(), &registry);
    let mut s = level(&registry);

    assert!(matches!(
        saves.load(&mut s.scene, "never_saved"),
        Err(SaveError::SlotNotFound(_))
    ));
}
