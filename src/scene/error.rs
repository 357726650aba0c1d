use thiserror::Error;

use super::object::ObjectId;

/// Errors that can occur while editing the live scene
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Handle refers to an object that was destroyed or never existed
    #[error("object {0} does not exist")]
    ObjectNotFound(ObjectId),

    /// Another live object already owns this saveable id
    #[error("saveable id '{0}' is already in use")]
    DuplicateId(String),

    /// Object already has a saveable component of this kind
    #[error("object {object} already has a '{kind}' component")]
    DuplicateComponentKind { object: ObjectId, kind: String },
}
