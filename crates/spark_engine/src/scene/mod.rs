//! Scenes
//!
//! A [`Scene`] owns a forest of entities. All entities, roots and children
//! alike, live in one slot map; the scene keeps the ordered list of roots
//! and every entity keeps its ordered child list. Frame dispatch walks that
//! forest in pre-order: an entity's own components fire before its children.
//!
//! Deletion is deferred. [`Scene::delete_entity`] only raises a flag; the
//! entity keeps receiving hooks until the end of the next [`Scene::update`],
//! which removes every flagged entity (at any depth) with its subtree.

mod detached;
pub mod error;
mod hierarchy;
pub mod scene_manager;

use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::SlotMap;

use crate::component::transform::render_transform_section;
use crate::component::{Capabilities, Component, TransformComponent};
use crate::config::RuntimeConfig;
use crate::entity::{EntityId, EntityMut, EntityNode, EntityRef};
use crate::render::Canvas;
use crate::ui::Ui;

pub use detached::DetachedEntity;
pub use error::SceneError;
pub use scene_manager::SceneManager;

/// Process-unique scene identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hook invoked for one checked-out component during dispatch
type Hook<'h> = dyn FnMut(&mut dyn Component, &mut EntityMut<'_>) + 'h;

/// An owning forest of entities
pub struct Scene {
    id: SceneId,
    name: String,
    entities: SlotMap<EntityId, EntityNode>,
    roots: Vec<EntityId>,
    fallback_name: String,
    fallback_entity_name: String,
    needs_init: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: &str) -> Self {
        Self::with_config(name, &RuntimeConfig::default())
    }

    /// Create an empty scene using the configured fallback names
    pub fn with_config(name: &str, config: &RuntimeConfig) -> Self {
        let mut scene = Self {
            id: SceneId::next(),
            name: String::new(),
            entities: SlotMap::with_key(),
            roots: Vec::new(),
            fallback_name: config.fallback_scene_name.clone(),
            fallback_entity_name: config.fallback_entity_name.clone(),
            needs_init: false,
        };
        scene.set_name(name);
        scene
    }

    /// Scene id
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the scene; an empty name becomes the fallback name
    pub fn set_name(&mut self, name: &str) {
        self.name = if name.is_empty() {
            self.fallback_name.clone()
        } else {
            name.to_string()
        };
    }

    fn entity_name_or_fallback(&self, name: &str) -> String {
        if name.is_empty() {
            self.fallback_entity_name.clone()
        } else {
            name.to_string()
        }
    }

    /// Create a new root entity
    pub fn emplace_entity(&mut self, name: &str) -> EntityId {
        let name = self.entity_name_or_fallback(name);
        log::debug!("Scene '{}': created entity '{}'", self.name, name);
        let id = self.entities.insert(EntityNode::new(name, None));
        self.roots.push(id);
        id
    }

    /// Create a new entity as the last child of `parent`
    pub fn emplace_child(&mut self, parent: EntityId, name: &str) -> Result<EntityId, SceneError> {
        if !self.entities.contains_key(parent) {
            log::warn!("Cannot create child: parent {parent:?} does not exist");
            return Err(SceneError::NoSuchEntity(parent));
        }

        let name = self.entity_name_or_fallback(name);
        log::debug!("Scene '{}': created child entity '{}' under {:?}", self.name, name, parent);
        let id = self.entities.insert(EntityNode::new(name, Some(parent)));
        self.attach(id, Some(parent));
        Ok(id)
    }

    /// Destroy an entity and its whole subtree
    ///
    /// Returns `false` if the entity does not exist.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        if !self.entities.contains_key(id) {
            return false;
        }
        log::debug!("Scene '{}': removing entity '{}'", self.name, self.entities[id].name);
        self.detach(id);
        self.despawn(id);
        true
    }

    /// Snapshot of the root entities
    ///
    /// Children are reached through [`Scene::children`] or [`Scene::walk`].
    pub fn all_entities(&self) -> Vec<EntityId> {
        self.roots.clone()
    }

    /// Root entities in insertion order
    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    /// Whether the entity belongs to this scene
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Number of entities at every depth
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub(crate) fn node(&self, id: EntityId) -> Option<&EntityNode> {
        self.entities.get(id)
    }

    /// Shared view of an entity
    pub fn entity(&self, id: EntityId) -> Option<EntityRef<'_>> {
        EntityRef::new(self, id)
    }

    /// Exclusive handle to an entity
    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        self.entities
            .contains_key(id)
            .then(|| EntityMut::new(self, id))
    }

    /// Visit every entity in pre-order with its depth (roots are depth 0)
    pub fn walk(&self, mut visit: impl FnMut(EntityRef<'_>, usize)) {
        let mut stack: Vec<(EntityId, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(entity) = self.entity(id) else {
                continue;
            };
            stack.extend(entity.children().iter().rev().map(|child| (*child, depth + 1)));
            visit(entity, depth);
        }
    }

    /// First entity in pre-order with the given name
    pub fn find_entity_by_name(&self, name: &str) -> Option<EntityId> {
        let mut found = None;
        self.walk(|entity, _| {
            if found.is_none() && entity.name() == name {
                found = Some(entity.id());
            }
        });
        found
    }

    /// Name of an entity
    pub fn entity_name(&self, id: EntityId) -> Option<&str> {
        self.entities.get(id).map(|node| node.name.as_str())
    }

    /// Rename an entity; an empty name becomes the fallback entity name
    pub fn set_entity_name(&mut self, id: EntityId, name: &str) -> bool {
        let name = self.entity_name_or_fallback(name);
        match self.entities.get_mut(id) {
            Some(node) => {
                node.name = name;
                true
            }
            None => false,
        }
    }

    /// Flag an entity for removal at the end of the next update
    pub fn delete_entity(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(id) {
            Some(node) => {
                node.to_be_deleted = true;
                true
            }
            None => false,
        }
    }

    /// Whether an entity is flagged for removal
    pub fn is_to_be_deleted(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(|node| node.to_be_deleted)
    }

    /// Attach a component to an entity
    ///
    /// If a component of the same type is already attached the new one is
    /// dropped and the existing one is returned. Returns `None` if the entity
    /// does not exist, or if the existing component is checked out because
    /// one of its own hooks is running.
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) -> Option<&mut T> {
        let node = self.entities.get_mut(id)?;
        if node.has_component::<T>() {
            log::debug!(
                "Entity '{}' already has a {}; keeping the existing one",
                node.name,
                std::any::type_name::<T>()
            );
        } else {
            let capabilities = node.components.insert(Box::new(component))?;
            log::debug!(
                "Entity '{}': added {} {:?}",
                node.name,
                std::any::type_name::<T>(),
                capabilities
            );
            if capabilities.contains(Capabilities::INIT) {
                self.needs_init = true;
            }
        }
        self.entities.get_mut(id)?.component_mut::<T>()
    }

    /// Component of type `T` on an entity
    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.entities.get(id)?.component::<T>()
    }

    /// Mutable component of type `T` on an entity
    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_mut(id)?.component_mut::<T>()
    }

    /// Whether an entity has a component of type `T`
    pub fn has_component<T: Component>(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(EntityNode::has_component::<T>)
    }

    /// Detach and drop the component of type `T`
    ///
    /// The transform cannot be removed. Returns `false` if nothing was removed.
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> bool {
        if TypeId::of::<T>() == TypeId::of::<TransformComponent>() {
            log::warn!("The transform component cannot be removed");
            return false;
        }
        let removed = self
            .entities
            .get_mut(id)
            .is_some_and(|node| node.components.remove(TypeId::of::<T>()));
        if removed {
            log::debug!("Entity {id:?}: removed {}", std::any::type_name::<T>());
        }
        removed
    }

    /// Transform of an entity
    pub fn transform(&self, id: EntityId) -> Option<&TransformComponent> {
        self.entities.get(id).map(|node| &node.transform)
    }

    /// Initialize every component that has not been initialized yet
    pub fn init(&mut self) {
        log::debug!("Scene '{}': init", self.name);
        self.needs_init = false;
        self.dispatch_roots(Capabilities::INIT, &mut |component, entity| {
            if let Some(initializable) = component.as_initializable() {
                initializable.init(entity);
            }
        });
    }

    /// Run one frame of updates, then remove flagged entities
    ///
    /// Components added since the last init are initialized first.
    pub fn update(&mut self, delta_time: f32) {
        if self.needs_init {
            self.init();
        }

        log::trace!("Scene '{}': update ({delta_time}s)", self.name);
        self.dispatch_roots(Capabilities::UPDATE, &mut |component, entity| {
            if let Some(updatable) = component.as_updatable() {
                updatable.update(entity, delta_time);
            }
        });

        self.sweep_deleted();
    }

    /// Render every render-capable component
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        log::trace!("Scene '{}': render", self.name);
        self.dispatch_roots(Capabilities::RENDER, &mut |component, entity| {
            if let Some(renderable) = component.as_renderable() {
                renderable.render(entity, canvas);
            }
        });
    }

    /// Render every debug overlay
    pub fn render_debug_overlay(&mut self, ui: &mut dyn Ui) {
        log::trace!("Scene '{}': debug overlay", self.name);
        self.dispatch_roots(Capabilities::DEBUG_OVERLAY, &mut |component, entity| {
            if let Some(debug) = component.as_debug_renderable() {
                debug.render_debug_overlay(entity, ui);
            }
        });
    }

    /// Render the inspector for a single entity
    ///
    /// Draws the name header, the transform section and then every
    /// inspector-capable component of that entity. Children are not visited.
    pub fn render_inspector(&mut self, id: EntityId, ui: &mut dyn Ui) -> bool {
        let Some(name) = self.entity_name(id).map(str::to_owned) else {
            return false;
        };

        ui.text(&name);
        ui.separator();
        render_transform_section(self, id, ui);

        self.dispatch_entity(id, Capabilities::INSPECTOR, &mut |component, entity| {
            if let Some(inspector) = component.as_inspector_renderable() {
                inspector.render_inspector(entity, ui);
            }
        });
        true
    }

    fn dispatch_roots(&mut self, capability: Capabilities, call: &mut Hook<'_>) {
        for root in self.roots.clone() {
            self.dispatch_tree(root, capability, call);
        }
    }

    fn dispatch_tree(&mut self, id: EntityId, capability: Capabilities, call: &mut Hook<'_>) {
        self.dispatch_entity(id, capability, call);

        let Some(node) = self.entities.get(id) else {
            return;
        };
        for child in node.children.clone() {
            self.dispatch_tree(child, capability, call);
        }
    }

    /// Call `call` for each component of one entity that has `capability`
    ///
    /// The component is checked out of its registry while the hook runs and
    /// checked back in afterwards. If the entity disappeared meanwhile the
    /// component is dropped with it.
    fn dispatch_entity(&mut self, id: EntityId, capability: Capabilities, call: &mut Hook<'_>) {
        let Some(node) = self.entities.get(id) else {
            return;
        };

        for type_id in node.components.dispatch_order(capability) {
            let Some(mut component) = self
                .entities
                .get_mut(id)
                .and_then(|node| node.components.checkout(type_id, capability))
            else {
                continue;
            };

            call(component.as_mut(), &mut EntityMut::new(self, id));

            if let Some(node) = self.entities.get_mut(id) {
                node.components.checkin(type_id, component);
            }
        }
    }

    /// Remove every flagged entity, at any depth, with its subtree
    fn sweep_deleted(&mut self) {
        let mut doomed = Vec::new();
        let mut stack: Vec<EntityId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.entities.get(id) else {
                continue;
            };
            if node.to_be_deleted {
                doomed.push(id);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }

        for id in doomed {
            self.remove_entity(id);
        }
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("roots", &self.roots)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Initializable, Renderable, Updatable};
    use crate::render::{Color, Rect};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        label: &'static str,
        log: Log,
    }

    impl Initializable for Probe {
        fn init(&mut self, _entity: &mut EntityMut<'_>) {
            self.log.borrow_mut().push(format!("init {}", self.label));
        }
    }

    impl Updatable for Probe {
        fn update(&mut self, _entity: &mut EntityMut<'_>, _delta_time: f32) {
            self.log.borrow_mut().push(format!("update {}", self.label));
        }
    }

    crate::impl_component!(Probe => init, update);

    struct SecondProbe(Log);

    impl Updatable for SecondProbe {
        fn update(&mut self, _entity: &mut EntityMut<'_>, _delta_time: f32) {
            self.0.borrow_mut().push("update second".to_string());
        }
    }

    impl Renderable for SecondProbe {
        fn render(&mut self, _entity: &mut EntityMut<'_>, canvas: &mut dyn Canvas) {
            canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        }
    }

    crate::impl_component!(SecondProbe => update, render);

    #[derive(Default)]
    struct CountingCanvas {
        fills: usize,
    }

    impl Canvas for CountingCanvas {
        fn set_draw_color(&mut self, _color: Color) {}
        fn clear(&mut self) {}
        fn present(&mut self) {}
        fn draw_point(&mut self, _x: f32, _y: f32) {}
        fn draw_line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32) {}
        fn draw_rect(&mut self, _rect: Rect) {}
        fn fill_rect(&mut self, _rect: Rect) {
            self.fills += 1;
        }
    }

    fn probe(label: &'static str, log: &Log) -> Probe {
        Probe {
            label,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn test_empty_names_fall_back() {
        let mut scene = Scene::new("");
        assert_eq!(scene.name(), "Scene");

        let id = scene.emplace_entity("");
        assert_eq!(scene.entity_name(id), Some("GameObject"));

        scene.set_name("Level 1");
        assert_eq!(scene.name(), "Level 1");
    }

    #[test]
    fn test_scene_ids_are_unique() {
        assert_ne!(Scene::new("a").id(), Scene::new("a").id());
    }

    #[test]
    fn test_dispatch_is_pre_order() {
        let log = Log::default();
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        let c = scene.emplace_entity("c");
        scene.add_component(c, probe("c", &log));
        scene.add_component(b, probe("b", &log));
        scene.add_component(a, probe("a", &log));

        scene.init();
        scene.update(0.016);

        assert_eq!(
            *log.borrow(),
            vec!["init a", "init b", "init c", "update a", "update b", "update c"]
        );
    }

    #[test]
    fn test_components_fire_in_insertion_order() {
        let log = Log::default();
        let mut scene = Scene::new("test");
        let id = scene.emplace_entity("e");
        scene.add_component(id, SecondProbe(Rc::clone(&log)));
        scene.add_component(id, probe("first", &log));

        scene.update(0.0);

        assert_eq!(*log.borrow(), vec!["init first", "update second", "update first"]);
    }

    #[test]
    fn test_init_runs_once_and_late_components_init_on_update() {
        let log = Log::default();
        let mut scene = Scene::new("test");
        let id = scene.emplace_entity("e");
        scene.add_component(id, probe("early", &log));

        scene.init();
        scene.init();
        let other = scene.emplace_entity("late");
        scene.add_component(other, probe("late", &log));
        scene.update(0.0);

        assert_eq!(
            *log.borrow(),
            vec!["init early", "init late", "update early", "update late"]
        );
    }

    #[test]
    fn test_render_reaches_render_capable_components() {
        let log = Log::default();
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        scene.add_component(a, SecondProbe(Rc::clone(&log)));
        scene.add_component(b, SecondProbe(Rc::clone(&log)));
        scene.add_component(b, probe("not rendered", &log));

        let mut canvas = CountingCanvas::default();
        scene.render(&mut canvas);

        assert_eq!(canvas.fills, 2);
    }

    #[test]
    fn test_remove_entity_destroys_subtree() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        let c = scene.emplace_child(b, "c").unwrap();
        let d = scene.emplace_entity("d");

        assert!(scene.remove_entity(a));

        assert!(!scene.contains(b));
        assert!(!scene.contains(c));
        assert_eq!(scene.all_entities(), vec![d]);
        assert_eq!(scene.entity_count(), 1);
        assert!(!scene.remove_entity(a));
    }

    #[test]
    fn test_walk_and_find_by_name() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        scene.emplace_entity("c");

        let mut visited = Vec::new();
        scene.walk(|entity, depth| visited.push((entity.name().to_string(), depth)));

        assert_eq!(
            visited,
            vec![("a".to_string(), 0), ("b".to_string(), 1), ("c".to_string(), 0)]
        );
        assert_eq!(scene.find_entity_by_name("b"), Some(b));
        assert_eq!(scene.find_entity_by_name("missing"), None);
    }

    #[test]
    fn test_transform_cannot_be_removed() {
        let mut scene = Scene::new("test");
        let id = scene.emplace_entity("e");

        assert!(!scene.remove_component::<TransformComponent>(id));
        assert!(scene.has_component::<TransformComponent>(id));
        assert!(scene.get_component::<TransformComponent>(id).is_some());
    }
}
