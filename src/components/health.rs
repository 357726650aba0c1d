//! Player health with heal-over-time
//!
//! Healing over time is an explicit timer advanced by `tick(dt)`: the
//! component stores elapsed time and duration and heals a proportional
//! slice each tick, so nothing suspends and the state is plain data.

use log::{debug, info, warn};
use std::any::Any;

use crate::events::{EventQueue, GameEvent};
use crate::item::UseEffect;
use crate::save::codec::{format_f32, parse_f32};
use crate::save::{Saveable, StateMap};
use crate::scene::Component;

/// An active heal-over-time effect
#[derive(Debug, Clone, Copy, PartialEq)]
struct HealOverTime {
    total: f32,
    duration: f32,
    elapsed: f32,
    healed: f32,
}

pub struct PlayerHealth {
    current: f32,
    max: f32,
    healing: Option<HealOverTime>,
    events: EventQueue,
}

impl PlayerHealth {
    /// Creates health at full
    pub fn new(max: f32, events: EventQueue) -> Self {
        PlayerHealth {
            current: max,
            max,
            healing: None,
            events,
        }
    }

    /// Sets the starting health, clamped to `0..=max`
    pub fn with_current(mut self, current: f32) -> Self {
        self.current = current.clamp(0.0, self.max);
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Returns health as a percentage (0.0 to 1.0)
    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 { 0.0 } else { self.current / self.max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_healing(&self) -> bool {
        self.healing.is_some()
    }

    /// Heals, capped at max health
    ///
    /// Returns the amount actually healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let healed = self.raise(amount);
        info!("Player healed {}. Health is now {}/{}", healed, self.current, self.max);
        healed
    }

    /// Applies damage, clamped at zero
    ///
    /// Damage interrupts any heal-over-time effect.
    pub fn take_damage(&mut self, amount: f32) {
        if self.healing.take().is_some() {
            info!("Healing effect was interrupted by damage");
        }

        self.current = (self.current - amount).max(0.0);
        self.notify();
        info!("Player took {} damage. Health is now {}/{}", amount, self.current, self.max);
    }

    /// Applies a consumable's effect
    ///
    /// A new heal-over-time replaces one that is already running.
    pub fn apply_effect(&mut self, effect: &UseEffect) {
        match *effect {
            UseEffect::Heal { amount, over_time: None } => {
                self.heal(amount);
            }
            UseEffect::Heal { amount, over_time: Some(duration) } if duration > 0.0 => {
                debug!("Starting heal-over-time: {} health over {} seconds", amount, duration);
                self.healing = Some(HealOverTime {
                    total: amount,
                    duration,
                    elapsed: 0.0,
                    healed: 0.0,
                });
            }
            UseEffect::Heal { amount, .. } => {
                self.heal(amount);
            }
        }
    }

    fn raise(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.notify();
        self.current - before
    }

    fn notify(&self) {
        self.events.push(GameEvent::HealthChanged {
            current: self.current,
            max: self.max,
        });
    }
}

impl Saveable for PlayerHealth {
    fn kind(&self) -> &'static str {
        "PlayerHealth"
    }

    fn capture_state(&self) -> StateMap {
        let mut state = StateMap::new();
        state.insert("currentHealth".to_string(), format_f32(self.current));
        state.insert("maxHealth".to_string(), format_f32(self.max));
        state
    }

    /// Max is applied first so the saved current value is clamped to it
    fn restore_state(&mut self, state: &StateMap) {
        match state.get("maxHealth").map(|v| parse_f32(v)) {
            Some(Some(value)) if value > 0.0 => self.max = value,
            Some(_) => warn!("Ignoring invalid saved max health"),
            None => {}
        }
        if let Some(value) = state.get("currentHealth").and_then(|v| parse_f32(v)) {
            self.current = value.clamp(0.0, self.max);
        }
        self.current = self.current.min(self.max);

        // A loaded game starts without the effect that was running at save time
        self.healing = None;
        self.notify();
    }
}

impl Component for PlayerHealth {
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

    fn tick(&mut self, dt: f32) {
        let Some(mut effect) = self.healing else {
            return;
        };

        effect.elapsed += dt;
        let step = (effect.total / effect.duration * dt).min(effect.total - effect.healed);
        effect.healed += step;
        self.raise(step);

        let finished = effect.healed >= effect.total || effect.elapsed >= effect.duration;
        if finished || self.current >= self.max {
            debug!("Heal-over-time effect finished");
            self.healing = None;
        } else {
            self.healing = Some(effect);
        }
    }
}
