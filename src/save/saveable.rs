//! Saveable trait for components that carry their own state
//!
//! This is the seam that keeps the tree walker generic: it never matches on
//! concrete component types, it only asks a component whether it implements
//! this contract and, if so, hands it a flat string map.

use super::types::StateMap;

/// Trait for components that can capture and restore their own fields
///
/// # Design Pattern: Trait-based Serialization
///
/// Each component decides how its fields map to string pairs. Transforms and
/// children are the walker's business and never appear here.
///
/// # Contract
///
/// - `capture_state` is pure and must work on a freshly created component.
/// - `restore_state` is recoverable by default: a missing key leaves the field
///   alone, a malformed value is skipped. It never panics on bad input.
///
/// # Example
///
/// ```ignore
/// impl Saveable for TreasureChest {
///     fn kind(&self) -> &'static str { "TreasureChest" }
///
///     fn capture_state(&self) -> StateMap {
///         let mut state = StateMap::new();
///         state.insert("isOpen".into(), format_bool(self.is_open));
///         state
///     }
///
///     fn restore_state(&mut self, state: &StateMap) {
///         if let Some(open) = state.get("isOpen").and_then(|v| parse_bool(v)) {
///             self.is_open = open;
///         }
///     }
/// }
/// ```
pub trait Saveable {
    /// Key under which this component's state is stored on its node
    ///
    /// Must be unique among the saveable components of one object.
    fn kind(&self) -> &'static str;

    /// Serialize this component's own fields
    fn capture_state(&self) -> StateMap;

    /// Apply previously captured state
    fn restore_state(&mut self, state: &StateMap);
}
