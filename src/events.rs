//! Game event queue
//!
//! Gameplay components push an event after every mutating operation; the UI
//! layer (or a test) drains the queue at a fixed point in the simulation loop.
//! This replaces static delegate broadcasts: components get a queue handle
//! injected at construction instead of reaching for a global.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    InventoryChanged,
    HealthChanged { current: f32, max: f32 },
    ChestHealthChanged { current: i32, max: i32 },
    ChestOpened(bool),
    ItemCrafted(String),
}

/// Shared handle to a single-threaded event queue
///
/// Cloning the handle shares the queue.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<GameEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: GameEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Takes every pending event, oldest first
    pub fn drain(&self) -> Vec<GameEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
