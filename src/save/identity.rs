//! Stable identifiers for saveable objects
//!
//! Every object that takes part in the save tree carries a `SaveableEntity`
//! marker holding its id. Ids are created lazily the first time the object
//! is saved and then stay with the object for its whole lifetime, so the
//! same object resolves to the same node across repeated saves.

use std::collections::HashSet;
use uuid::Uuid;

use crate::scene::SceneError;

/// Marker that makes an object part of the save tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveableEntity {
    unique_id: Option<String>,
}

impl SaveableEntity {
    pub fn new() -> Self {
        SaveableEntity { unique_id: None }
    }

    /// Returns the id if one has been assigned yet
    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }
}

/// Hands out and tracks saveable ids
///
/// One registry belongs to one `Scene`; there is no global state, so
/// independent worlds (e.g. in tests) never see each other's ids.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    /// Every id this registry ever issued or adopted. Append-only.
    issued: HashSet<String>,

    /// Ids owned by objects that currently exist
    live: HashSet<String>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entity's id, generating one on first use
    ///
    /// Idempotent: calling this twice on the same entity returns the same id.
    pub fn ensure_id<'e>(&mut self, entity: &'e mut SaveableEntity) -> &'e str {
        entity
            .unique_id
            .get_or_insert_with(|| self.generate())
            .as_str()
    }

    /// Attaches an authored id to an entity (e.g. from level data)
    ///
    /// Fails if another live object already owns that id. Re-adopting the
    /// id the entity already has is a no-op.
    pub fn adopt(&mut self, entity: &mut SaveableEntity, id: &str) -> Result<(), SceneError> {
        if entity.unique_id() == Some(id) {
            return Ok(());
        }
        if self.live.contains(id) {
            return Err(SceneError::DuplicateId(id.to_string()));
        }

        if let Some(old) = entity.unique_id.take() {
            self.live.remove(&old);
        }

        self.issued.insert(id.to_string());
        self.live.insert(id.to_string());
        entity.unique_id = Some(id.to_string());
        Ok(())
    }

    /// Marks the entity's id as no longer live
    ///
    /// The id stays in the issued set and is never handed out again.
    pub fn release(&mut self, entity: &SaveableEntity) {
        if let Some(id) = entity.unique_id() {
            self.live.remove(id);
        }
    }

    pub fn is_live(&self, id: &str) -> bool {
        self.live.contains(id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn generate(&mut self) -> String {
        // 122 random bits; the loop only guards against the theoretical collision
        loop {
            let id = Uuid::new_v4().to_string();
            if self.issued.insert(id.clone()) {
                self.live.insert(id.clone());
                return id;
            }
        }
    }
}
