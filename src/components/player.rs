use std::any::Any;

use crate::save::codec::{format_vec3, parse_vec3};
use crate::save::{Saveable, StateMap};
use crate::scene::Component;

/// Player movement state
///
/// Saves the simulated position as a single `"x,y,z"` string.
pub struct PlayerController {
    position: [f32; 3],
    pub speed: f32,
}

impl PlayerController {
    pub fn new(position: [f32; 3], speed: f32) -> Self {
        PlayerController { position, speed }
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn teleport(&mut self, position: [f32; 3]) {
        self.position = position;
    }

    /// Moves along `direction` for `dt` seconds
    ///
    /// Diagonal input is normalized so every direction moves at the same speed.
    pub fn move_by(&mut self, direction: [f32; 3], dt: f32) {
        let length = direction.iter().map(|c| c * c).sum::<f32>().sqrt();
        if length <= f32::EPSILON {
            return;
        }

        for (axis, component) in self.position.iter_mut().zip(direction) {
            *axis += component / length * self.speed * dt;
        }
    }
}

impl Saveable for PlayerController {
    fn kind(&self) -> &'static str {
        "PlayerController"
    }

    fn capture_state(&self) -> StateMap {
        let mut state = StateMap::new();
        state.insert("playerPosition".to_string(), format_vec3(self.position));
        state
    }

    fn restore_state(&mut self, state: &StateMap) {
        if let Some(position) = state.get("playerPosition").and_then(|v| parse_vec3(v)) {
            self.position = position;
        }
    }
}

impl Component for PlayerController {
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
