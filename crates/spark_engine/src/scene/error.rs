//! Scene errors

use thiserror::Error;

use crate::entity::EntityId;

use super::SceneId;

/// Rejected scene and hierarchy operations
///
/// Every variant describes a precondition the caller broke; the scene is
/// left untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The entity is not part of this scene
    #[error("entity {0:?} does not exist in this scene")]
    NoSuchEntity(EntityId),

    /// Reparenting to the entity's current parent
    #[error("entity {0:?} already has the requested parent")]
    AlreadyParented(EntityId),

    /// Reparenting an entity under itself
    #[error("entity {0:?} cannot be its own parent")]
    SelfParent(EntityId),

    /// Reparenting an entity under one of its descendants
    #[error("parenting {child:?} under its descendant {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Entity being moved
        child: EntityId,
        /// Requested parent, a descendant of `child`
        parent: EntityId,
    },

    /// No scene with this id is managed
    #[error("no scene with id {0}")]
    NoSuchScene(SceneId),

    /// No scene with this name is managed
    #[error("no scene named {0:?}")]
    SceneNotFound(String),

    /// The scene is already managed
    #[error("scene {0} is already managed")]
    DuplicateScene(SceneId),

    /// The current scene cannot be removed
    #[error("scene {0} is the current scene and cannot be removed")]
    CannotRemoveCurrent(SceneId),
}
