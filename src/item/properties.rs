use serde::{Deserialize, Serialize};

/// Broad category used for placement rules and status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCategory {
    Generic,
    Ingredient,
    Potion,
    Key,
    Recipe,
}

/// What an item can do, with type-specific data
///
/// Inventory code dispatches on this with `match` instead of asking
/// "is this a usable item / a recipe" at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Plain item, no behaviour of its own
    Generic,

    /// Consumed from the inventory for an effect
    Usable(UseEffect),

    /// Learned by the player, crafts `output` from `ingredients`
    Recipe(Recipe),
}

/// Effects for usable items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UseEffect {
    /// Restore health, instantly or spread over `over_time` seconds
    Heal { amount: f32, over_time: Option<f32> },
}

/// A crafting recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub ingredients: Vec<String>,
    pub output: String,
}

impl Recipe {
    pub fn new(ingredients: &[&str], output: impl Into<String>) -> Self {
        Recipe {
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            output: output.into(),
        }
    }

    /// Returns true if `available` holds every required ingredient
    ///
    /// Order doesn't matter, duplicates do: a recipe needing two herbs
    /// needs two herbs on offer.
    pub fn can_craft(&self, available: &[String]) -> bool {
        if self.ingredients.is_empty() {
            return false;
        }

        self.ingredients.iter().all(|required| {
            let needed = self.ingredients.iter().filter(|i| *i == required).count();
            let offered = available.iter().filter(|a| *a == required).count();
            offered >= needed
        })
    }
}
