//! Per-entity component registry
//!
//! Holds at most one component per concrete type, remembers insertion order
//! and keeps one dispatch list per capability. A component can be checked out
//! while one of its hooks runs; the slot stays registered but empty until the
//! component is checked back in.

use std::any::TypeId;
use std::collections::HashMap;

use crate::component::{Capabilities, Component, TransformComponent};

/// Capabilities that get their own dispatch list, in list order
const CACHED: [Capabilities; 5] = [
    Capabilities::INIT,
    Capabilities::UPDATE,
    Capabilities::RENDER,
    Capabilities::DEBUG_OVERLAY,
    Capabilities::INSPECTOR,
];

struct Slot {
    component: Option<Box<dyn Component>>,
    capabilities: Capabilities,
    initialized: bool,
}

/// Type-keyed component storage with capability dispatch lists
#[derive(Default)]
pub struct ComponentRegistry {
    slots: HashMap<TypeId, Slot>,
    order: Vec<TypeId>,
    caches: [Vec<TypeId>; 5],
}

fn cache_index(capability: Capabilities) -> Option<usize> {
    CACHED.iter().position(|cached| *cached == capability)
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under its concrete type
    ///
    /// Returns the probed capabilities, or `None` (dropping `component`) if
    /// the type is already registered. A [`TransformComponent`] is always
    /// refused; every entity carries its own outside the registry.
    pub fn insert(&mut self, mut component: Box<dyn Component>) -> Option<Capabilities> {
        let type_id = component.as_any().type_id();
        if type_id == TypeId::of::<TransformComponent>() {
            log::warn!("The transform component is owned by the entity, not its registry");
            return None;
        }
        if self.slots.contains_key(&type_id) {
            return None;
        }

        let capabilities = Capabilities::probe(component.as_mut());
        for (index, capability) in CACHED.iter().enumerate() {
            if capabilities.contains(*capability) {
                self.caches[index].push(type_id);
            }
        }
        self.order.push(type_id);
        self.slots.insert(
            type_id,
            Slot {
                component: Some(component),
                capabilities,
                initialized: false,
            },
        );

        Some(capabilities)
    }

    /// Unregister a component type, dropping the instance
    ///
    /// A checked-out instance is dropped when it is checked back in.
    pub fn remove(&mut self, type_id: TypeId) -> bool {
        if self.slots.remove(&type_id).is_none() {
            return false;
        }
        self.order.retain(|t| *t != type_id);
        for cache in &mut self.caches {
            cache.retain(|t| *t != type_id);
        }
        true
    }

    /// Whether a component type is registered (checked out or not)
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.slots.contains_key(&type_id)
    }

    /// Borrow a component; `None` while it is checked out
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())?
            .component
            .as_ref()?
            .as_any()
            .downcast_ref::<T>()
    }

    /// Mutably borrow a component; `None` while it is checked out
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.slots
            .get_mut(&TypeId::of::<T>())?
            .component
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Capabilities probed when the component was added
    pub fn capabilities(&self, type_id: TypeId) -> Option<Capabilities> {
        self.slots.get(&type_id).map(|slot| slot.capabilities)
    }

    /// Dispatch list for a single capability, in insertion order
    pub fn cached(&self, capability: Capabilities) -> &[TypeId] {
        cache_index(capability).map_or(&[][..], |index| self.caches[index].as_slice())
    }

    /// Component types a dispatch of `capability` should visit now
    ///
    /// For [`Capabilities::INIT`] only components that were never
    /// initialized are listed. Every other capability skips components
    /// still waiting for their init hook.
    pub fn dispatch_order(&self, capability: Capabilities) -> Vec<TypeId> {
        let wants_init = capability == Capabilities::INIT;
        self.cached(capability)
            .iter()
            .copied()
            .filter(|type_id| {
                self.slots.get(type_id).is_some_and(|slot| {
                    let pending = slot.capabilities.contains(Capabilities::INIT) && !slot.initialized;
                    pending == wants_init
                })
            })
            .collect()
    }

    /// Whether any component still waits for its init hook
    pub fn has_pending_init(&self) -> bool {
        !self.dispatch_order(Capabilities::INIT).is_empty()
    }

    /// Take a component out for the duration of a hook
    ///
    /// Checking out for [`Capabilities::INIT`] marks the component initialized.
    pub fn checkout(&mut self, type_id: TypeId, capability: Capabilities) -> Option<Box<dyn Component>> {
        let slot = self.slots.get_mut(&type_id)?;
        let component = slot.component.take()?;
        if capability == Capabilities::INIT {
            slot.initialized = true;
        }
        Some(component)
    }

    /// Return a checked-out component
    ///
    /// If its type was removed meanwhile (or replaced by a new instance) the
    /// returned component is dropped.
    pub fn checkin(&mut self, type_id: TypeId, component: Box<dyn Component>) {
        if let Some(slot) = self.slots.get_mut(&type_id) {
            if slot.component.is_none() {
                slot.component = Some(component);
            }
        }
    }

    /// Registered component types in insertion order
    pub fn type_ids(&self) -> &[TypeId] {
        &self.order
    }

    /// Number of registered components
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no component is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Initializable, Updatable};
    use crate::entity::EntityMut;

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    crate::impl_component!(Health);

    struct Ticker;

    impl Initializable for Ticker {
        fn init(&mut self, _entity: &mut EntityMut<'_>) {}
    }

    impl Updatable for Ticker {
        fn update(&mut self, _entity: &mut EntityMut<'_>, _delta_time: f32) {}
    }

    crate::impl_component!(Ticker => init, update);

    struct Other;

    impl Updatable for Other {
        fn update(&mut self, _entity: &mut EntityMut<'_>, _delta_time: f32) {}
    }

    crate::impl_component!(Other => update);

    #[test]
    fn test_duplicate_type_is_rejected() {
        let mut registry = ComponentRegistry::new();
        assert_eq!(registry.insert(Box::new(Health(1))), Some(Capabilities::empty()));
        assert_eq!(registry.insert(Box::new(Health(2))), None);
        assert_eq!(registry.get::<Health>(), Some(&Health(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_caches_follow_insertion_order() {
        let mut registry = ComponentRegistry::new();
        registry.insert(Box::new(Ticker));
        registry.insert(Box::new(Health(3)));
        registry.insert(Box::new(Other));

        assert_eq!(
            registry.cached(Capabilities::UPDATE),
            &[TypeId::of::<Ticker>(), TypeId::of::<Other>()]
        );
        assert_eq!(registry.cached(Capabilities::INIT), &[TypeId::of::<Ticker>()]);
        assert!(registry.cached(Capabilities::RENDER).is_empty());
    }

    #[test]
    fn test_remove_clears_every_cache() {
        let mut registry = ComponentRegistry::new();
        registry.insert(Box::new(Ticker));

        assert!(registry.remove(TypeId::of::<Ticker>()));
        assert!(!registry.remove(TypeId::of::<Ticker>()));
        assert!(registry.cached(Capabilities::INIT).is_empty());
        assert!(registry.cached(Capabilities::UPDATE).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_checkout_hides_component_until_checkin() {
        let mut registry = ComponentRegistry::new();
        registry.insert(Box::new(Health(7)));
        let type_id = TypeId::of::<Health>();

        let component = registry.checkout(type_id, Capabilities::UPDATE).unwrap();
        assert!(registry.get::<Health>().is_none());
        assert!(registry.contains(type_id));

        registry.checkin(type_id, component);
        assert_eq!(registry.get::<Health>(), Some(&Health(7)));
    }

    #[test]
    fn test_checkin_after_remove_drops_component() {
        let mut registry = ComponentRegistry::new();
        registry.insert(Box::new(Health(7)));
        let type_id = TypeId::of::<Health>();

        let component = registry.checkout(type_id, Capabilities::UPDATE).unwrap();
        registry.remove(type_id);
        registry.checkin(type_id, component);

        assert!(!registry.contains(type_id));
        assert!(registry.get::<Health>().is_none());
    }

    #[test]
    fn test_init_checkout_marks_initialized() {
        let mut registry = ComponentRegistry::new();
        registry.insert(Box::new(Ticker));
        let type_id = TypeId::of::<Ticker>();
        assert!(registry.has_pending_init());

        let component = registry.checkout(type_id, Capabilities::INIT).unwrap();
        registry.checkin(type_id, component);

        assert!(!registry.has_pending_init());
        assert!(registry.dispatch_order(Capabilities::INIT).is_empty());
        assert_eq!(registry.dispatch_order(Capabilities::UPDATE), vec![type_id]);
    }

    #[test]
    fn test_uninitialized_component_is_not_updated() {
        let mut registry = ComponentRegistry::new();
        registry.insert(Box::new(Ticker));
        registry.insert(Box::new(Other));

        assert_eq!(registry.dispatch_order(Capabilities::UPDATE), vec![TypeId::of::<Other>()]);

        let component = registry.checkout(TypeId::of::<Ticker>(), Capabilities::INIT).unwrap();
        registry.checkin(TypeId::of::<Ticker>(), component);

        assert_eq!(
            registry.dispatch_order(Capabilities::UPDATE),
            vec![TypeId::of::<Ticker>(), TypeId::of::<Other>()]
        );
    }

    #[test]
    fn test_transform_is_refused() {
        let mut registry = ComponentRegistry::new();
        assert_eq!(registry.insert(Box::new(TransformComponent::default())), None);
        assert!(registry.is_empty());
        assert!(!registry.contains(TypeId::of::<TransformComponent>()));
    }
}
