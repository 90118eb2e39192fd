//! Entities
//!
//! Entities live in their scene's slot map and are addressed by [`EntityId`].
//! Parent links, child lists and the scene's root list are plain ids into
//! that arena, so moving an entity around the tree never moves the entity
//! itself. [`EntityRef`] and [`EntityMut`] are the handles through which
//! callers and component hooks look at one entity.

mod handle;
pub mod registry;

use std::any::{Any, TypeId};

use slotmap::new_key_type;

use crate::component::{Component, TransformComponent};

pub use handle::{EntityMut, EntityRef};
pub use registry::ComponentRegistry;

new_key_type! {
    /// Stable handle to an entity within its scene
    pub struct EntityId;
}

/// Arena record for one entity
pub(crate) struct EntityNode {
    pub(crate) name: String,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) transform: TransformComponent,
    pub(crate) components: ComponentRegistry,
    pub(crate) to_be_deleted: bool,
}

impl EntityNode {
    pub(crate) fn new(name: String, parent: Option<EntityId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            transform: TransformComponent::default(),
            components: ComponentRegistry::new(),
            to_be_deleted: false,
        }
    }

    fn is_transform<T: Component>() -> bool {
        TypeId::of::<T>() == TypeId::of::<TransformComponent>()
    }

    pub(crate) fn component<T: Component>(&self) -> Option<&T> {
        if Self::is_transform::<T>() {
            return (&self.transform as &dyn Any).downcast_ref::<T>();
        }
        self.components.get::<T>()
    }

    pub(crate) fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        if Self::is_transform::<T>() {
            return (&mut self.transform as &mut dyn Any).downcast_mut::<T>();
        }
        self.components.get_mut::<T>()
    }

    pub(crate) fn has_component<T: Component>(&self) -> bool {
        Self::is_transform::<T>() || self.components.contains(TypeId::of::<T>())
    }

    /// Number of components including the transform
    pub(crate) fn component_count(&self) -> usize {
        self.components.len() + 1
    }
}
