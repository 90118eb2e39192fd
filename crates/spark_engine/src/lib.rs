//! # Spark Engine
//!
//! Entity/component runtime for interactive applications: a tree of named
//! entities, each composed of pluggable components with optional lifecycle
//! capabilities, and a hierarchical transform with a lazily recomputed world
//! matrix cache.
//!
//! ## Features
//!
//! - **Arena-backed scene tree**: entities live in a slot map; reparenting only rewrites ids
//! - **Capability dispatch**: components opt into init, update, render, debug overlay and inspector hooks
//! - **Transform hierarchy**: cached world matrices with subtree invalidation
//! - **Scene management**: several scenes, one current, frame calls forwarded to it
//! - **Backend agnostic**: drawing and UI are traits supplied by the application
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spark_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let scene = engine.scenes_mut().current_scene_mut();
//!         let hello = scene.emplace_entity("Hello");
//!         let world = scene.emplace_entity("World");
//!         scene.set_parent(world, Some(hello), true)?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         // Update game logic
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, engine: &mut Engine) {
//!         // Cleanup resources
//!     }
//! }
//!
//! fn run(canvas: &mut dyn Canvas, ui: &mut dyn Ui) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RuntimeConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app, canvas, ui)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod component;
pub mod entity;
pub mod scene;
pub mod render;
pub mod ui;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineError,
        foundation::{
            math::{utils, Vec3, Mat4, Quat, Transform},
            time::FrameClock,
        },
        config::{Config, ConfigError, RuntimeConfig, FrameConfig},
        component::{
            Capabilities, Component, TransformComponent,
            Initializable, Updatable, Renderable, DebugRenderable, InspectorRenderable,
        },
        entity::{EntityId, EntityRef, EntityMut},
        scene::{Scene, SceneId, SceneManager, SceneError, DetachedEntity},
        render::{Canvas, Color, Rect},
        ui::{Ui, TreeNodeFlags, TreeNodeResponse, EditorPanels},
    };
}
