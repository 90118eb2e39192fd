//! # Scene Manager
//!
//! Owns every loaded scene and selects the current one. Exactly one scene is
//! current at any time: a new manager creates and selects a default scene,
//! and the current scene cannot be removed. Frame calls are forwarded to the
//! current scene only.

use crate::config::RuntimeConfig;
use crate::entity::EntityId;
use crate::render::Canvas;
use crate::ui::Ui;

use super::{Scene, SceneError, SceneId};

/// Owner and selector of scenes
#[derive(Debug)]
pub struct SceneManager {
    scenes: Vec<Scene>,
    current: usize,
    config: RuntimeConfig,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneManager {
    /// Create a manager holding a current "default scene"
    pub fn new() -> Self {
        Self::with_config(&RuntimeConfig::default())
    }

    /// Create a manager whose default scene and fallback names come from `config`
    pub fn with_config(config: &RuntimeConfig) -> Self {
        let default_scene = Scene::with_config(&config.default_scene_name, config);
        log::debug!("Created default scene '{}'", default_scene.name());
        Self {
            scenes: vec![default_scene],
            current: 0,
            config: config.clone(),
        }
    }

    /// Create a new, non-current scene
    pub fn emplace_scene(&mut self, name: &str) -> SceneId {
        let scene = Scene::with_config(name, &self.config);
        let id = scene.id();
        log::debug!("Created scene '{}' ({id})", scene.name());
        self.scenes.push(scene);
        id
    }

    /// Take ownership of an existing scene
    pub fn add_scene(&mut self, scene: Scene) -> Result<SceneId, SceneError> {
        let id = scene.id();
        if self.index_of(id).is_some() {
            log::warn!("Scene {id} is already managed");
            return Err(SceneError::DuplicateScene(id));
        }
        log::debug!("Added scene '{}' ({id})", scene.name());
        self.scenes.push(scene);
        Ok(id)
    }

    fn index_of(&self, id: SceneId) -> Option<usize> {
        self.scenes.iter().position(|scene| scene.id() == id)
    }

    fn index_of_name(&self, name: &str) -> Option<usize> {
        self.scenes.iter().position(|scene| scene.name() == name)
    }

    /// Scene by id
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id() == id)
    }

    /// Mutable scene by id
    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|scene| scene.id() == id)
    }

    /// First scene with the given name
    pub fn scene_by_name(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.name() == name)
    }

    /// Mutable first scene with the given name
    pub fn scene_by_name_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|scene| scene.name() == name)
    }

    /// All scenes in insertion order
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Number of managed scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// The current scene
    pub fn current_scene(&self) -> &Scene {
        &self.scenes[self.current]
    }

    /// The current scene, mutably
    pub fn current_scene_mut(&mut self) -> &mut Scene {
        &mut self.scenes[self.current]
    }

    /// Id of the current scene
    pub fn current_scene_id(&self) -> SceneId {
        self.current_scene().id()
    }

    /// Make a scene current
    pub fn switch_to_scene(&mut self, id: SceneId) -> Result<(), SceneError> {
        let Some(index) = self.index_of(id) else {
            log::warn!("Cannot switch to scene {id}: not managed");
            return Err(SceneError::NoSuchScene(id));
        };
        self.current = index;
        log::debug!("Switched to scene '{}'", self.current_scene().name());
        Ok(())
    }

    /// Make the first scene with the given name current
    ///
    /// An unknown name leaves the current scene unchanged.
    pub fn switch_to_scene_by_name(&mut self, name: &str) -> Result<(), SceneError> {
        let Some(index) = self.index_of_name(name) else {
            log::warn!("Cannot switch to scene '{name}': not found");
            return Err(SceneError::SceneNotFound(name.to_string()));
        };
        self.current = index;
        log::debug!("Switched to scene '{name}'");
        Ok(())
    }

    /// Destroy a non-current scene
    pub fn remove_scene(&mut self, id: SceneId) -> Result<(), SceneError> {
        let Some(index) = self.index_of(id) else {
            log::warn!("Cannot remove scene {id}: not managed");
            return Err(SceneError::NoSuchScene(id));
        };
        self.remove_at(index)
    }

    /// Destroy the first non-current scene with the given name
    ///
    /// Fails with [`SceneError::CannotRemoveCurrent`] only when the current
    /// scene is the sole scene of that name.
    pub fn remove_scene_by_name(&mut self, name: &str) -> Result<(), SceneError> {
        let candidate = self
            .scenes
            .iter()
            .enumerate()
            .position(|(index, scene)| index != self.current && scene.name() == name);
        match candidate.or_else(|| self.index_of_name(name)) {
            Some(index) => self.remove_at(index),
            None => {
                log::warn!("Cannot remove scene '{name}': not found");
                Err(SceneError::SceneNotFound(name.to_string()))
            }
        }
    }

    fn remove_at(&mut self, index: usize) -> Result<(), SceneError> {
        if index == self.current {
            let id = self.current_scene_id();
            log::warn!("Cannot remove scene {id}: it is the current scene");
            return Err(SceneError::CannotRemoveCurrent(id));
        }

        let removed = self.scenes.remove(index);
        if index < self.current {
            self.current -= 1;
        }
        log::debug!("Removed scene '{}'", removed.name());
        Ok(())
    }

    /// Initialize the current scene
    pub fn init(&mut self) {
        self.current_scene_mut().init();
    }

    /// Update the current scene
    pub fn update(&mut self, delta_time: f32) {
        self.current_scene_mut().update(delta_time);
    }

    /// Render the current scene
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        self.current_scene_mut().render(canvas);
    }

    /// Render the current scene's debug overlays
    pub fn render_debug_overlay(&mut self, ui: &mut dyn Ui) {
        self.current_scene_mut().render_debug_overlay(ui);
    }

    /// Render the inspector for an entity of the current scene
    pub fn render_inspector(&mut self, id: EntityId, ui: &mut dyn Ui) -> bool {
        self.current_scene_mut().render_inspector(id, ui)
    }
}
