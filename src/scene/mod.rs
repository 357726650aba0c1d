// Scene module
//
// The live object hierarchy the save system walks:
// - GameObject nodes with transforms, active flags and components
// - Component trait (the "does this object expose X" query)
// - Scene arena with parent/child links and saveable identities

pub mod error;
pub mod object;
#[allow(clippy::module_inception)]
pub mod scene;

pub use error::SceneError;
pub use object::{Component, GameObject, ObjectId, Transform};
pub use scene::Scene;
