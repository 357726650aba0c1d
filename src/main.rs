use log::{info, warn};
use std::rc::Rc;

use alchemist_save::SaveConfig;
use alchemist_save::components::{
    CraftingTable, IngredientStation, PlayerController, PlayerHealth, TreasureChest, WorldItem,
};
use alchemist_save::events::{EventQueue, GameEvent};
use alchemist_save::inventory::PlayerInventory;
use alchemist_save::item::ItemRegistry;
use alchemist_save::save::{LoadReport, SaveSystem};
use alchemist_save::scene::{ObjectId, Scene, Transform};

const USAGE: &str = "usage: alchemist_save [--config <file>] <demo | save <slot> | load <slot> | list | delete <slot>>";

/// Handles to the interesting objects of the sample world
struct World {
    scene: Scene,
    player: ObjectId,
    chest: ObjectId,
    table: ObjectId,
    stations: Vec<ObjectId>,
}

/// Builds the sample alchemy room
///
/// Saveable objects get fixed ids, the same way authored scene objects keep
/// theirs between runs, so a slot written by one run resolves in the next.
fn build_world(registry: &Rc<ItemRegistry>, events: &EventQueue, config: &SaveConfig) -> Result<World, String> {
    let mut scene = Scene::new();

    let player = scene.spawn("Player");
    scene.make_saveable_with_id(player, "player").map_err(|e| e.to_string())?;
    scene
        .add_component(player, PlayerController::new([0.0, 0.0, 0.0], 4.0))
        .map_err(|e| e.to_string())?;
    scene
        .add_component(player, PlayerHealth::new(100.0, events.clone()))
        .map_err(|e| e.to_string())?;
    scene
        .add_component(
            player,
            PlayerInventory::new(config.inventory_capacity, Rc::clone(registry), events.clone()),
        )
        .map_err(|e| e.to_string())?;

    let room = scene.spawn("Alchemy Room");
    scene.make_saveable_with_id(room, "alchemy_room").map_err(|e| e.to_string())?;

    let chest = scene.spawn_child(room, "Treasure Chest").map_err(|e| e.to_string())?;
    scene.make_saveable_with_id(chest, "chest_01").map_err(|e| e.to_string())?;
    scene
        .set_transform(chest, Transform::from_position([3.0, 0.0, 2.0]))
        .map_err(|e| e.to_string())?;
    scene
        .add_component(chest, TreasureChest::new(events.clone()))
        .map_err(|e| e.to_string())?;

    let table = scene.spawn_child(room, "Crafting Table").map_err(|e| e.to_string())?;
    let mut stations = Vec::new();
    for (i, offset) in [-0.5f32, 0.5].into_iter().enumerate() {
        let station = scene
            .spawn_child(room, format!("Ingredient Station {}", i + 1))
            .map_err(|e| e.to_string())?;
        scene
            .make_saveable_with_id(station, &format!("station_{:02}", i + 1))
            .map_err(|e| e.to_string())?;
        scene
            .set_transform(station, Transform::from_position([offset, 1.0, -3.0]))
            .map_err(|e| e.to_string())?;
        scene
            .add_component(station, IngredientStation::new(Rc::clone(registry)))
            .map_err(|e| e.to_string())?;
        stations.push(station);
    }
    scene
        .add_component(
            table,
            CraftingTable::new(stations.clone(), Rc::clone(registry), events.clone()),
        )
        .map_err(|e| e.to_string())?;

    for (item_id, position) in [
        ("item_herb_01", [1.0, 0.0, 4.0]),
        ("item_mushroom_01", [-2.0, 0.0, 1.5]),
        ("recipe_potion_01", [0.0, 0.0, -1.0]),
    ] {
        WorldItem::spawn(&mut scene, registry, item_id, Transform::from_position(position));
    }

    Ok(World {
        scene,
        player,
        chest,
        table,
        stations,
    })
}

/// Plays through a short session, saves it, scrambles the world and loads it back
fn run_demo(world: &mut World, saves: &mut SaveSystem, events: &EventQueue) -> Result<(), String> {
    let scene = &mut world.scene;

    for _ in 0..10 {
        if let Some(controller) = scene.component_mut::<PlayerController>(world.player) {
            controller.move_by([1.0, 0.0, 0.5], 0.1);
        }
        scene.tick(0.1);
    }

    for item in scene.objects_with::<WorldItem>() {
        if let Err(e) = WorldItem::collect(scene, item, world.player) {
            warn!("Could not pick up item: {}", e);
        }
    }

    for (station, item_id) in world.stations.iter().zip(["item_herb_01", "item_mushroom_01"]) {
        if let Some((inventory, station)) =
            scene.components_of_pair_mut::<PlayerInventory, IngredientStation>(world.player, *station)
        {
            station.place_from(inventory, item_id).map_err(|e| e.to_string())?;
        }
    }
    match CraftingTable::craft(scene, world.table, world.player) {
        Ok(Some(crafted)) => info!("Crafted {}", crafted),
        Ok(None) => info!("Nothing crafted"),
        Err(e) => warn!("Crafting failed: {}", e),
    }

    if let Some(chest) = scene.component_mut::<TreasureChest>(world.chest) {
        chest.take_damage(50);
        chest.activate();
    }
    if let Some(health) = scene.component_mut::<PlayerHealth>(world.player) {
        health.take_damage(35.0);
    }

    let path = saves.save(scene, "demo").map_err(|e| e.to_string())?;
    info!("Saved demo session to {}", path.display());

    if let Some((inventory, health)) =
        scene.component_pair_mut::<PlayerInventory, PlayerHealth>(world.player)
    {
        if let Err(e) = inventory.use_item("item_potion_01", health) {
            warn!("Could not drink potion: {}", e);
        }
    }
    if let Some(controller) = scene.component_mut::<PlayerController>(world.player) {
        controller.teleport([100.0, 0.0, 100.0]);
    }

    let report = saves.load(scene, "demo").map_err(|e| e.to_string())?;
    print_report(&report);
    print_state(world);

    let drained = events.drain();
    let crafted = drained
        .iter()
        .filter(|e| matches!(e, GameEvent::ItemCrafted(_)))
        .count();
    info!("{} events during the demo ({} crafts)", drained.len(), crafted);
    Ok(())
}

fn print_report(report: &LoadReport) {
    println!("Restored objects:   {}", report.restored);
    println!("World items:        {}", report.world_items_spawned);
    for id in &report.unresolved {
        println!("  unresolved:       {}", id);
    }
    for (id, kind) in &report.missing_contracts {
        println!("  missing {:<12} on {}", kind, id);
    }
    for item_id in &report.world_items_skipped {
        println!("  unknown item:     {}", item_id);
    }
}

fn print_state(world: &World) {
    let scene = &world.scene;
    if let Some(controller) = scene.component::<PlayerController>(world.player) {
        println!("Player position:    {:?}", controller.position());
    }
    if let Some(health) = scene.component::<PlayerHealth>(world.player) {
        println!("Player health:      {}/{}", health.current(), health.max());
    }
    if let Some(inventory) = scene.component::<PlayerInventory>(world.player) {
        println!("Inventory:          {:?}", inventory.items());
        println!("Known recipes:      {:?}", inventory.recipes());
    }
    if let Some(chest) = scene.component::<TreasureChest>(world.chest) {
        println!(
            "Chest:              {} ({} hp)",
            if chest.is_open() { "open" } else { "closed" },
            chest.current_health()
        );
    }
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let config = if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            return Err(USAGE.to_string());
        }
        let path = args.remove(1);
        args.remove(0);
        SaveConfig::load_from_file(&path)
            .map_err(|e| format!("Failed to load save config {}: {}", path, e))?
    } else {
        SaveConfig::from_env()
    };

    let registry = Rc::new(ItemRegistry::create_default());
    let events = EventQueue::new();
    let mut world = build_world(&registry, &events, &config)?;
    let mut saves = SaveSystem::new(&config, Rc::clone(&registry))
        .map_err(|e| format!("Failed to create save system: {}", e))?;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["demo"] => run_demo(&mut world, &mut saves, &events)?,
        ["save", slot] => {
            let path = saves.save(&mut world.scene, slot).map_err(|e| e.to_string())?;
            println!("Saved to {}", path.display());
        }
        ["load", slot] => {
            let report = saves.load(&mut world.scene, slot).map_err(|e| e.to_string())?;
            print_report(&report);
            print_state(&world);
        }
        ["delete", slot] => {
            saves.manager_mut().delete_slot(slot).map_err(|e| e.to_string())?;
            println!("Deleted {}", slot);
        }
        ["list"] => {
            let list = saves.manager().list_saves().map_err(|e| e.to_string())?;
            if list.is_empty() {
                println!("No saves in {}", saves.manager().save_directory().display());
            }
            for save in list {
                let modified: chrono::DateTime<chrono::Local> = save.modified.into();
                println!(
                    "{:<28} {:?} {} (v{})",
                    save.slot_name,
                    save.metadata.save_type,
                    modified.format("%Y-%m-%d %H:%M:%S"),
                    save.metadata.game_version
                );
            }
        }
        _ => return Err(USAGE.to_string()),
    }

    Ok(())
}
