use log::info;
use std::any::Any;

use crate::events::{EventQueue, GameEvent};
use crate::save::codec::{format_bool, format_i32, parse_bool, parse_i32};
use crate::save::{Saveable, StateMap};
use crate::scene::Component;

pub const CHEST_MAX_HEALTH: i32 = 50;

/// A breakable chest that can only be opened once it is broken
pub struct TreasureChest {
    max_health: i32,
    current_health: i32,
    is_open: bool,
    events: EventQueue,
}

impl TreasureChest {
    pub fn new(events: EventQueue) -> Self {
        TreasureChest {
            max_health: CHEST_MAX_HEALTH,
            current_health: CHEST_MAX_HEALTH,
            is_open: false,
            events,
        }
    }

    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Damages the chest; health stops at zero and a broken chest ignores hits
    pub fn take_damage(&mut self, amount: i32) {
        if self.current_health <= 0 {
            return;
        }

        self.current_health = (self.current_health - amount.max(0)).max(0);
        self.events.push(GameEvent::ChestHealthChanged {
            current: self.current_health,
            max: self.max_health,
        });
        info!(
            "The chest takes {} damage. Health is now {}",
            amount, self.current_health
        );
    }

    /// Toggles the lid
    ///
    /// Returns false (and does nothing) while the chest is still intact.
    pub fn activate(&mut self) -> bool {
        if self.current_health > 0 {
            return false;
        }

        self.is_open = !self.is_open;
        self.events.push(GameEvent::ChestOpened(self.is_open));
        true
    }
}

impl Saveable for TreasureChest {
    fn kind(&self) -> &'static str {
        "TreasureChest"
    }

    fn capture_state(&self) -> StateMap {
        let mut state = StateMap::new();
        state.insert("isOpen".to_string(), format_bool(self.is_open));
        state.insert("currentHealth".to_string(), format_i32(self.current_health));
        state
    }

    fn restore_state(&mut self, state: &StateMap) {
        if let Some(open) = state.get("isOpen").and_then(|v| parse_bool(v)) {
            self.is_open = open;
        }
        if let Some(health) = state.get("currentHealth").and_then(|v| parse_i32(v)) {
            self.current_health = health.clamp(0, self.max_health);
        }
    }
}

impl Component for TreasureChest {
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
