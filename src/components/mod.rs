// Gameplay components
//
// Each saveable component here implements the Saveable contract and
// flattens its own fields into string pairs:
// - player.rs: player movement/position
// - health.rs: player health with heal-over-time timer
// - chest.rs: breakable treasure chest
// - station.rs: ingredient station (one crafting ingredient)
// - crafting.rs: crafting table + recipe matching (not saved)
// - world_item.rs: runtime pick-ups (saved separately, not in the tree)

pub mod chest;
pub mod crafting;
pub mod health;
pub mod player;
pub mod station;
pub mod world_item;

pub use chest::TreasureChest;
pub use crafting::{CraftingTable, find_matching_recipe};
pub use health::PlayerHealth;
pub use player::PlayerController;
pub use station::IngredientStation;
pub use world_item::WorldItem;
