//! Entities outside any scene
//!
//! A [`DetachedEntity`] owns its name, transform, components and children by
//! value. It is what [`Scene::pop_entity`] hands out and what
//! [`Scene::add_entity`] adopts, so moving a subtree between scenes is a
//! plain move and an entity can never be owned twice.

use crate::component::{Component, TransformComponent};
use crate::entity::{ComponentRegistry, EntityId, EntityNode};
use crate::foundation::math::{Quat, Transform, Vec3};

use super::Scene;

/// An entity subtree that is not owned by a scene
pub struct DetachedEntity {
    name: String,
    transform: TransformComponent,
    components: ComponentRegistry,
    children: Vec<DetachedEntity>,
}

impl DetachedEntity {
    /// Create an empty entity with an identity transform
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: TransformComponent::default(),
            components: ComponentRegistry::new(),
            children: Vec::new(),
        }
    }

    /// Attach a component; a second component of the same type is dropped
    ///
    /// A [`TransformComponent`] replaces the entity's transform.
    #[must_use]
    pub fn with_component<T: Component>(mut self, component: T) -> Self {
        let mut component: Box<dyn Component> = Box::new(component);
        if let Some(transform) = component.as_any_mut().downcast_mut::<TransformComponent>() {
            self.transform = std::mem::take(transform);
            return self;
        }
        if self.components.insert(component).is_none() {
            log::debug!(
                "Detached entity '{}' already has a {}",
                self.name,
                std::any::type_name::<T>()
            );
        }
        self
    }

    /// Append a child subtree
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Set the local position
    #[must_use]
    pub fn with_local_position(mut self, position: Vec3) -> Self {
        self.transform.set_position(position);
        self
    }

    /// Set the local rotation
    #[must_use]
    pub fn with_local_rotation(mut self, rotation: Quat) -> Self {
        self.transform.set_rotation(rotation);
        self
    }

    /// Set the local scale
    #[must_use]
    pub fn with_local_scale(mut self, scale: Vec3) -> Self {
        self.transform.set_scale(scale);
        self
    }

    /// Entity name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child subtrees
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Local transform
    pub fn transform(&self) -> &TransformComponent {
        &self.transform
    }

    /// Component of type `T`
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.components.get::<T>()
    }

    /// Number of entities in the subtree, this one included
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

impl Scene {
    /// Adopt a detached entity subtree as a new root
    ///
    /// Components that were already initialized are not initialized again.
    pub fn add_entity(&mut self, entity: DetachedEntity) -> EntityId {
        let id = self.spawn(entity, None);
        self.roots.push(id);
        log::debug!("Scene '{}': adopted entity {id:?}", self.name);
        id
    }

    fn spawn(&mut self, entity: DetachedEntity, parent: Option<EntityId>) -> EntityId {
        let DetachedEntity {
            name,
            transform,
            components,
            children,
        } = entity;

        if components.has_pending_init() {
            self.needs_init = true;
        }
        transform.mark_dirty();

        let name = self.entity_name_or_fallback(&name);
        let id = self.entities.insert(EntityNode {
            transform,
            components,
            ..EntityNode::new(name, parent)
        });

        for child in children {
            let child_id = self.spawn(child, Some(id));
            if let Some(node) = self.entities.get_mut(id) {
                node.children.push(child_id);
            }
        }
        id
    }

    /// Release an entity subtree from the scene without destroying it
    ///
    /// The entity's world transform becomes its local transform, so adopting
    /// it as a root elsewhere keeps its placement.
    pub fn pop_entity(&mut self, id: EntityId) -> Option<DetachedEntity> {
        let world = Transform::from_matrix(&self.world_matrix(id)?);
        self.detach(id);
        let mut entity = self.extract(id)?;
        entity.transform.set_local(world);
        log::debug!("Scene '{}': popped entity '{}'", self.name, entity.name);
        Some(entity)
    }

    /// Remove a detached subtree from the arena
    pub(crate) fn despawn(&mut self, id: EntityId) {
        drop(self.extract(id));
    }

    fn extract(&mut self, id: EntityId) -> Option<DetachedEntity> {
        let node = self.entities.remove(id)?;
        let children = node
            .children
            .into_iter()
            .filter_map(|child| self.extract(child))
            .collect();
        Some(DetachedEntity {
            name: node.name,
            transform: node.transform,
            components: node.components,
            children,
        })
    }
}
