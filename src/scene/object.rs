use std::any::Any;
use std::fmt;

use crate::save::{Saveable, SaveableEntity};

/// Handle to an object in a `Scene`
///
/// Handles are never reused, so a handle to a destroyed object simply
/// stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rigid transform, always relative to the parent object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: [f32; 3],
    /// Quaternion as (x, y, z, w)
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    pub fn from_position(position: [f32; 3]) -> Self {
        Transform { position, ..Self::IDENTITY }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Behaviour attached to a `GameObject`
///
/// Components that want to be saved return themselves from
/// `as_saveable`; everything else keeps the default `None`.
pub trait Component: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_saveable(&self) -> Option<&dyn Saveable> {
        None
    }

    fn as_saveable_mut(&mut self) -> Option<&mut dyn Saveable> {
        None
    }

    /// Advances per-tick timers
    fn tick(&mut self, _dt: f32) {}
}

/// One node of the live scene hierarchy
pub struct GameObject {
    pub name: String,
    pub(crate) active_self: bool,
    pub transform: Transform,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) saveable: Option<SaveableEntity>,
    pub(crate) components: Vec<Box<dyn Component>>,
}

impl GameObject {
    pub(crate) fn new(name: impl Into<String>, parent: Option<ObjectId>) -> Self {
        GameObject {
            name: name.into(),
            active_self: true,
            transform: Transform::IDENTITY,
            parent,
            children: Vec::new(),
            saveable: None,
            components: Vec::new(),
        }
    }

    pub fn active_self(&self) -> bool {
        self.active_self
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn is_saveable(&self) -> bool {
        self.saveable.is_some()
    }

    pub fn saveable_id(&self) -> Option<&str> {
        self.saveable.as_ref().and_then(SaveableEntity::unique_id)
    }

    pub fn component<C: Component>(&self) -> Option<&C> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<C>())
    }

    pub fn component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<C>())
    }

    pub fn has_component<C: Component>(&self) -> bool {
        self.component::<C>().is_some()
    }

    /// Iterates every component implementing the save contract
    pub fn saveables(&self) -> impl Iterator<Item = &dyn Saveable> {
        self.components.iter().filter_map(|c| c.as_saveable())
    }

    pub fn saveables_mut(&mut self) -> impl Iterator<Item = &mut dyn Saveable> {
        self.components.iter_mut().filter_map(|c| c.as_saveable_mut())
    }
}
