//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use crate::scene::SceneError;
use crate::ui::Ui;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive your own scenes with the engine's frame
/// loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the scenes are initialized. Use this to build the
    /// initial scenes and entities.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before the current scene is updated.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Draw application UI
    ///
    /// Called after the scene's debug overlays, before the frame is presented.
    fn render_ui(&mut self, engine: &mut Engine, ui: &mut dyn Ui) -> Result<(), AppError> {
        let _ = (engine, ui);
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once when the frame loop ends.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Rejected scene operation
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
