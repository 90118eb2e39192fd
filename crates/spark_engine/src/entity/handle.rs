//! Entity handles

use crate::component::{Component, TransformComponent};
use crate::foundation::math::{Mat4, Quat, Vec3};
use crate::scene::{Scene, SceneError};

use super::{EntityId, EntityNode};

/// Shared view of a live entity
#[derive(Clone, Copy)]
pub struct EntityRef<'a> {
    scene: &'a Scene,
    node: &'a EntityNode,
    id: EntityId,
}

impl<'a> EntityRef<'a> {
    pub(crate) fn new(scene: &'a Scene, id: EntityId) -> Option<Self> {
        let node = scene.node(id)?;
        Some(Self { scene, node, id })
    }

    /// Entity id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Entity name (not necessarily unique)
    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    /// Parent entity, `None` for scene roots
    pub fn parent(&self) -> Option<EntityId> {
        self.node.parent
    }

    /// Direct children in insertion order
    pub fn children(&self) -> &'a [EntityId] {
        &self.node.children
    }

    /// Whether `other` is a direct child of this entity
    pub fn is_child(&self, other: EntityId) -> bool {
        self.node.children.contains(&other)
    }

    /// Whether `other` is a child, grandchild, ... of this entity
    pub fn is_descendant(&self, other: EntityId) -> bool {
        self.scene.is_descendant(self.id, other)
    }

    /// Whether [`EntityMut::delete`] flagged this entity for the next sweep
    pub fn is_to_be_deleted(&self) -> bool {
        self.node.to_be_deleted
    }

    /// Component of type `T`
    pub fn get_component<T: Component>(&self) -> Option<&'a T> {
        self.node.component::<T>()
    }

    /// Whether a component of type `T` is attached
    pub fn has_component<T: Component>(&self) -> bool {
        self.node.has_component::<T>()
    }

    /// Number of attached components, transform included
    pub fn component_count(&self) -> usize {
        self.node.component_count()
    }

    /// The entity's transform
    pub fn transform(&self) -> &'a TransformComponent {
        &self.node.transform
    }

    /// World matrix, recomputed through the ancestors if stale
    pub fn world_matrix(&self) -> Mat4 {
        self.scene.world_matrix(self.id).unwrap_or_else(Mat4::identity)
    }

    /// World position
    pub fn world_position(&self) -> Vec3 {
        self.scene.world_position(self.id).unwrap_or_else(Vec3::zeros)
    }

    /// World rotation
    pub fn world_rotation(&self) -> Quat {
        self.scene.world_rotation(self.id).unwrap_or_else(Quat::identity)
    }

    /// World scale
    pub fn world_scale(&self) -> Vec3 {
        self.scene.world_scale(self.id).unwrap_or_else(|| Vec3::new(1.0, 1.0, 1.0))
    }

    /// The owning scene
    pub fn scene(&self) -> &'a Scene {
        self.scene
    }
}

/// Exclusive handle to an entity
///
/// Component hooks receive one of these for their owning entity. Every call
/// goes through the scene, so structural changes (adding components,
/// reparenting, spawning or deleting entities) are allowed. The component
/// whose hook is running is checked out meanwhile and cannot be looked up
/// through the handle.
///
/// If the entity is removed while a handle to it is alive, getters fall back
/// to `None` / empty values and setters do nothing.
pub struct EntityMut<'a> {
    scene: &'a mut Scene,
    id: EntityId,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(scene: &'a mut Scene, id: EntityId) -> Self {
        Self { scene, id }
    }

    /// Entity id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Reborrow as a shared view
    pub fn as_entity_ref(&self) -> Option<EntityRef<'_>> {
        EntityRef::new(self.scene, self.id)
    }

    /// Entity name
    pub fn name(&self) -> &str {
        self.scene.entity_name(self.id).unwrap_or_default()
    }

    /// Rename the entity; an empty name becomes the scene's fallback name
    pub fn set_name(&mut self, name: &str) {
        self.scene.set_entity_name(self.id, name);
    }

    /// Parent entity, `None` for scene roots
    pub fn parent(&self) -> Option<EntityId> {
        self.scene.parent(self.id)
    }

    /// Direct children in insertion order
    pub fn children(&self) -> &[EntityId] {
        self.scene.children(self.id)
    }

    /// Whether `other` is a direct child of this entity
    pub fn is_child(&self, other: EntityId) -> bool {
        self.scene.is_child(self.id, other)
    }

    /// Whether `other` is a child, grandchild, ... of this entity
    pub fn is_descendant(&self, other: EntityId) -> bool {
        self.scene.is_descendant(self.id, other)
    }

    /// Attach a component, or return the one of the same type already attached
    pub fn add_component<T: Component>(&mut self, component: T) -> Option<&mut T> {
        self.scene.add_component(self.id, component)
    }

    /// Component of type `T`
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.scene.get_component::<T>(self.id)
    }

    /// Mutable component of type `T`
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.scene.get_component_mut::<T>(self.id)
    }

    /// Whether a component of type `T` is attached
    pub fn has_component<T: Component>(&self) -> bool {
        self.scene.has_component::<T>(self.id)
    }

    /// Detach and drop the component of type `T`
    pub fn remove_component<T: Component>(&mut self) -> bool {
        self.scene.remove_component::<T>(self.id)
    }

    /// The entity's transform
    pub fn transform(&self) -> Option<&TransformComponent> {
        self.scene.transform(self.id)
    }

    /// Set the local position, invalidating the subtree
    pub fn set_local_position(&mut self, position: Vec3) -> bool {
        self.scene.set_local_position(self.id, position)
    }

    /// Set the local rotation, invalidating the subtree
    pub fn set_local_rotation(&mut self, rotation: Quat) -> bool {
        self.scene.set_local_rotation(self.id, rotation)
    }

    /// Set the local scale, invalidating the subtree
    pub fn set_local_scale(&mut self, scale: Vec3) -> bool {
        self.scene.set_local_scale(self.id, scale)
    }

    /// World matrix
    pub fn world_matrix(&self) -> Mat4 {
        self.scene.world_matrix(self.id).unwrap_or_else(Mat4::identity)
    }

    /// World position
    pub fn world_position(&self) -> Vec3 {
        self.scene.world_position(self.id).unwrap_or_else(Vec3::zeros)
    }

    /// Move the entity under `new_parent`, or to the scene roots for `None`
    pub fn set_parent(&mut self, new_parent: Option<EntityId>, keep_world_transform: bool) -> Result<(), SceneError> {
        self.scene.set_parent(self.id, new_parent, keep_world_transform)
    }

    /// Create a named child entity
    pub fn emplace_child(&mut self, name: &str) -> Result<EntityId, SceneError> {
        self.scene.emplace_child(self.id, name)
    }

    /// Flag the entity for removal at the end of the next scene update
    pub fn delete(&mut self) {
        self.scene.delete_entity(self.id);
    }

    /// Whether the entity is flagged for removal
    pub fn is_to_be_deleted(&self) -> bool {
        self.scene.is_to_be_deleted(self.id)
    }

    /// The owning scene
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// The owning scene, mutably
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }
}
