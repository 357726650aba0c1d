use log::debug;

use super::error::SceneError;
use super::object::{Component, GameObject, ObjectId, Transform};
use crate::save::{IdentityRegistry, SaveableEntity};

/// The live object hierarchy
///
/// A rooted forest of `GameObject`s stored in an append-only arena.
/// Stands in for the host engine: the save system only needs to walk
/// parent/child links, read and write transforms and query components.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Option<GameObject>>,
    roots: Vec<ObjectId>,
    identities: IdentityRegistry,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ======================================================================
    // Hierarchy
    // ======================================================================

    /// Creates a new root-level object
    pub fn spawn(&mut self, name: impl Into<String>) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(Some(GameObject::new(name, None)));
        self.roots.push(id);
        id
    }

    /// Creates a new object under `parent`
    pub fn spawn_child(
        &mut self,
        parent: ObjectId,
        name: impl Into<String>,
    ) -> Result<ObjectId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::ObjectNotFound(parent));
        }

        let id = ObjectId(self.objects.len());
        self.objects.push(Some(GameObject::new(name, Some(parent))));
        self.object_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Destroys an object and its whole subtree
    ///
    /// Saveable ids owned by destroyed objects are released.
    pub fn destroy(&mut self, id: ObjectId) -> Result<(), SceneError> {
        let parent = self.object(id)?.parent;

        match parent {
            Some(parent_id) => {
                if let Some(Some(parent)) = self.objects.get_mut(parent_id.0) {
                    parent.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(object) = self.objects.get_mut(next.0).and_then(Option::take) {
                if let Some(entity) = &object.saveable {
                    self.identities.release(entity);
                }
                debug!("Destroyed object {} '{}'", next, object.name);
                pending.extend(object.children);
            }
        }

        Ok(())
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        matches!(self.objects.get(id.0), Some(Some(_)))
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Borrows two different objects mutably at once
    pub fn pair_mut(&mut self, a: ObjectId, b: ObjectId) -> Option<(&mut GameObject, &mut GameObject)> {
        if a == b || a.0 >= self.objects.len() || b.0 >= self.objects.len() {
            return None;
        }

        let (low, high) = self.objects.split_at_mut(a.0.max(b.0));
        let (first, second) = (low[a.0.min(b.0)].as_mut()?, high[0].as_mut()?);
        if a < b { Some((first, second)) } else { Some((second, first)) }
    }

    /// Component `A` on object `a` and component `B` on object `b`, both mutable
    pub fn components_of_pair_mut<A: Component, B: Component>(
        &mut self,
        a: ObjectId,
        b: ObjectId,
    ) -> Option<(&mut A, &mut B)> {
        let (first, second) = self.pair_mut(a, b)?;
        Some((first.component_mut::<A>()?, second.component_mut::<B>()?))
    }

    /// Root-level objects in creation order
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.get(id).map(|o| o.children.as_slice()).unwrap_or(&[])
    }

    pub fn object_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    /// All live objects, depth-first, parents before children
    pub fn preorder(&self) -> Vec<ObjectId> {
        let mut order = Vec::with_capacity(self.objects.len());
        let mut stack: Vec<ObjectId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }

        order
    }

    /// First object with the given name, in preorder
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.preorder()
            .into_iter()
            .find(|id| self.get(*id).is_some_and(|o| o.name == name))
    }

    // ======================================================================
    // Object state
    // ======================================================================

    pub fn transform(&self, id: ObjectId) -> Option<Transform> {
        self.get(id).map(|o| o.transform)
    }

    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) -> Result<(), SceneError> {
        self.object_mut(id)?.transform = transform;
        Ok(())
    }

    pub fn set_active(&mut self, id: ObjectId, active: bool) -> Result<(), SceneError> {
        self.object_mut(id)?.active_self = active;
        Ok(())
    }

    /// True if the object and all its ancestors are active
    pub fn is_active_in_hierarchy(&self, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(next) = current {
            match self.get(next) {
                Some(object) if object.active_self => current = object.parent,
                _ => return false,
            }
        }
        true
    }

    // ======================================================================
    // Saveable identity
    // ======================================================================

    /// Marks an object as part of the save tree
    ///
    /// The id itself is generated lazily on the first save.
    pub fn make_saveable(&mut self, id: ObjectId) -> Result<(), SceneError> {
        let object = self.object_mut(id)?;
        if object.saveable.is_none() {
            object.saveable = Some(SaveableEntity::new());
        }
        Ok(())
    }

    /// Marks an object saveable under an authored id
    pub fn make_saveable_with_id(&mut self, id: ObjectId, unique_id: &str) -> Result<(), SceneError> {
        let Scene { objects, identities, .. } = self;
        let object = objects
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SceneError::ObjectNotFound(id))?;

        let entity = object.saveable.get_or_insert_with(SaveableEntity::new);
        identities.adopt(entity, unique_id)
    }

    pub fn is_saveable(&self, id: ObjectId) -> bool {
        self.get(id).is_some_and(GameObject::is_saveable)
    }

    /// Returns the object's saveable id, assigning one if needed
    ///
    /// Returns `None` for objects that are not saveable.
    pub fn ensure_id(&mut self, id: ObjectId) -> Option<String> {
        let Scene { objects, identities, .. } = self;
        let entity = objects.get_mut(id.0)?.as_mut()?.saveable.as_mut()?;
        Some(identities.ensure_id(entity).to_string())
    }

    pub fn identities(&self) -> &IdentityRegistry {
        &self.identities
    }

    // ======================================================================
    // Components
    // ======================================================================

    /// Attaches a component
    ///
    /// Rejects a second saveable component of the same kind on one object,
    /// since both would write to the same state key.
    pub fn add_component<C: Component>(&mut self, id: ObjectId, component: C) -> Result<(), SceneError> {
        let object = self.object_mut(id)?;

        if let Some(kind) = component.as_saveable().map(|s| s.kind()) {
            if object.saveables().any(|s| s.kind() == kind) {
                return Err(SceneError::DuplicateComponentKind {
                    object: id,
                    kind: kind.to_string(),
                });
            }
        }

        object.components.push(Box::new(component));
        Ok(())
    }

    /// Removes the first component of type `C`, returning whether one was found
    pub fn remove_component<C: Component>(&mut self, id: ObjectId) -> bool {
        let Some(object) = self.get_mut(id) else {
            return false;
        };

        match object.components.iter().position(|c| c.as_any().is::<C>()) {
            Some(index) => {
                object.components.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn component<C: Component>(&self, id: ObjectId) -> Option<&C> {
        self.get(id)?.component::<C>()
    }

    pub fn component_mut<C: Component>(&mut self, id: ObjectId) -> Option<&mut C> {
        self.get_mut(id)?.component_mut::<C>()
    }

    /// Borrows two different components of one object mutably at once
    pub fn component_pair_mut<A: Component, B: Component>(
        &mut self,
        id: ObjectId,
    ) -> Option<(&mut A, &mut B)> {
        let components = &mut self.get_mut(id)?.components;
        let a = components.iter().position(|c| c.as_any().is::<A>())?;
        let b = components.iter().position(|c| c.as_any().is::<B>())?;
        if a == b {
            return None;
        }

        let (low, high) = components.split_at_mut(a.max(b));
        let (first, second) = (&mut low[a.min(b)], &mut high[0]);
        let (for_a, for_b) = if a < b { (first, second) } else { (second, first) };

        Some((
            for_a.as_any_mut().downcast_mut::<A>()?,
            for_b.as_any_mut().downcast_mut::<B>()?,
        ))
    }

    /// Every object carrying a component of type `C`, in preorder
    pub fn objects_with<C: Component>(&self) -> Vec<ObjectId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(GameObject::has_component::<C>))
            .collect()
    }

    /// Advances component timers on every object active in the hierarchy
    pub fn tick(&mut self, dt: f32) {
        for id in self.preorder() {
            if !self.is_active_in_hierarchy(id) {
                continue;
            }
            if let Some(object) = self.get_mut(id) {
                for component in object.components.iter_mut() {
                    component.tick(dt);
                }
            }
        }
    }

    fn object(&self, id: ObjectId) -> Result<&GameObject, SceneError> {
        self.get(id).ok_or(SceneError::ObjectNotFound(id))
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut GameObject, SceneError> {
        self.get_mut(id).ok_or(SceneError::ObjectNotFound(id))
    }
}
