//! Capture and restore of the scene's save tree
//!
//! # Capture
//!
//! Roots are the saveable objects that have no saveable ancestor, found in
//! depth-first order over the scene hierarchy. From each root the walker
//! only descends through saveable children: a non-saveable child is skipped
//! together with everything below it.
//!
//! # Restore
//!
//! Live saveable objects are indexed by id once, then the saved tree is
//! walked parent before children. A node whose id has no live object is
//! skipped *with its whole subtree*; its children are never looked at.
//! Per-node problems are logged and collected in a `LoadReport`, they never
//! abort the walk.
//!
//! Transforms are captured and applied in local (parent-relative) space.

use log::{debug, warn};
use std::collections::HashMap;

use super::types::{ComponentStates, SaveNode, SceneSave, WorldItemSave};
use crate::components::WorldItem;
use crate::item::ItemRegistry;
use crate::scene::{ObjectId, Scene, Transform};

/// What happened during a restore
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Nodes matched to a live object and restored
    pub restored: usize,

    /// Ids of saved nodes with no live counterpart, one entry per node
    pub unresolved: Vec<String>,

    /// (object id, component kind) pairs whose state had nowhere to go
    pub missing_contracts: Vec<(String, String)>,

    pub world_items_spawned: usize,

    /// Saved world items whose item id is no longer registered
    pub world_items_skipped: Vec<String>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
            && self.missing_contracts.is_empty()
            && self.world_items_skipped.is_empty()
    }
}

// ======================================================================
// Capture
// ======================================================================

/// Builds a fresh save tree from the live scene
///
/// Assigns ids to saveable objects that don't have one yet; otherwise
/// read-only.
pub fn capture_scene(scene: &mut Scene) -> SceneSave {
    let root_objects = save_roots(scene)
        .into_iter()
        .filter_map(|id| capture_node(scene, id))
        .collect();

    let world_items = scene
        .objects_with::<WorldItem>()
        .into_iter()
        .filter(|id| !scene.is_saveable(*id))
        .filter_map(|id| {
            let object = scene.get(id)?;
            let item = object.component::<WorldItem>()?;
            Some(WorldItemSave {
                item_id: item.item_id().to_string(),
                position: object.transform.position.into(),
                rotation: object.transform.rotation.into(),
            })
        })
        .collect();

    SceneSave {
        root_objects,
        world_items,
    }
}

/// Saveable objects without a saveable ancestor, in depth-first order
pub fn save_roots(scene: &Scene) -> Vec<ObjectId> {
    let mut roots = Vec::new();
    let mut stack: Vec<ObjectId> = scene.roots().iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        if scene.is_saveable(id) {
            roots.push(id);
        } else {
            stack.extend(scene.children(id).iter().rev().copied());
        }
    }

    roots
}

fn capture_node(scene: &mut Scene, id: ObjectId) -> Option<SaveNode> {
    let unique_id = scene.ensure_id(id)?;
    let object = scene.get(id)?;

    let mut component_state = ComponentStates::new();
    for saveable in object.saveables() {
        let kind = saveable.kind();
        if component_state.contains_key(kind) {
            // add_component rejects this, so it can only come from a bad component impl
            warn!("Object '{}' has two '{}' components, keeping the first", object.name, kind);
            continue;
        }
        component_state.insert(kind.to_string(), saveable.capture_state());
    }

    let mut node = SaveNode {
        id: unique_id,
        name: object.name.clone(),
        is_active: object.active_self(),
        position: object.transform.position.into(),
        rotation: object.transform.rotation.into(),
        scale: object.transform.scale.into(),
        component_state,
        children: Vec::new(),
    };

    let saveable_children: Vec<ObjectId> = object
        .children()
        .iter()
        .copied()
        .filter(|child| scene.is_saveable(*child))
        .collect();

    node.children = saveable_children
        .into_iter()
        .filter_map(|child| capture_node(scene, child))
        .collect();

    Some(node)
}

// ======================================================================
// Restore
// ======================================================================

/// Applies a saved tree to the live scene
///
/// World items are replaced wholesale: every live pick-up that isn't
/// saveable is despawned and the saved ones are spawned from `registry`.
pub fn restore_scene(scene: &mut Scene, save: &SceneSave, registry: &ItemRegistry) -> LoadReport {
    let mut report = LoadReport::default();
    let index = index_live_objects(scene);

    for node in &save.root_objects {
        restore_node(scene, &index, node, &mut report);
    }

    restore_world_items(scene, &save.world_items, registry, &mut report);

    debug!(
        "Restored {} nodes, {} unresolved, {} orphaned component states",
        report.restored,
        report.unresolved.len(),
        report.missing_contracts.len()
    );
    report
}

/// Every live saveable object that has an id, keyed by that id
fn index_live_objects(scene: &Scene) -> HashMap<String, ObjectId> {
    scene
        .preorder()
        .into_iter()
        .filter_map(|id| Some((scene.get(id)?.saveable_id()?.to_string(), id)))
        .collect()
}

fn restore_node(
    scene: &mut Scene,
    index: &HashMap<String, ObjectId>,
    node: &SaveNode,
    report: &mut LoadReport,
) {
    let Some(object) = index.get(&node.id).and_then(|id| scene.get_mut(*id)) else {
        warn!(
            "Saved object '{}' ({}) no longer exists, skipping it and its {} descendants",
            node.name,
            node.id,
            node.subtree_len() - 1
        );
        report.unresolved.push(node.id.clone());
        return;
    };

    object.active_self = node.is_active;
    object.transform = node.transform();

    let mut applied = Vec::with_capacity(node.component_state.len());
    for saveable in object.saveables_mut() {
        let kind = saveable.kind();
        if let Some(state) = node.component_state.get(kind) {
            saveable.restore_state(state);
            applied.push(kind);
        }
    }

    for kind in node.component_state.keys() {
        if !applied.iter().any(|k| *k == kind.as_str()) {
            warn!(
                "Object '{}' ({}) has no '{}' component, ignoring its saved state",
                node.name, node.id, kind
            );
            report
                .missing_contracts
                .push((node.id.clone(), kind.clone()));
        }
    }

    report.restored += 1;

    for child in &node.children {
        restore_node(scene, index, child, report);
    }
}

fn restore_world_items(
    scene: &mut Scene,
    saved: &[WorldItemSave],
    registry: &ItemRegistry,
    report: &mut LoadReport,
) {
    // Saveable pick-ups were placed in the level and restored through the tree
    for id in scene.objects_with::<WorldItem>() {
        if scene.is_saveable(id) {
            continue;
        }
        // may already be gone if a parent world item was destroyed first
        let _ = scene.destroy(id);
    }

    for item in saved {
        let transform = Transform {
            position: item.position.to_array(),
            rotation: item.rotation.to_array(),
            scale: Transform::IDENTITY.scale,
        };

        match WorldItem::spawn(scene, registry, &item.item_id, transform) {
            Some(_) => report.world_items_spawned += 1,
            None => report.world_items_skipped.push(item.item_id.clone()),
        }
    }
}
